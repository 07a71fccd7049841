mod admin_service_impl;
mod identity_api_fake;
mod jwt_token_decoder;
mod sales_panel_impl;
mod session_guard_impl;

pub use admin_service_impl::*;
pub use identity_api_fake::*;
pub use jwt_token_decoder::*;
pub use sales_panel_impl::*;
pub use session_guard_impl::*;
