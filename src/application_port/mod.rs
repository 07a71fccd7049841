mod admin_api;
mod admin_service;
mod identity_api;
mod sales_panel;
mod session_guard;
mod token_decoder;

pub use admin_api::*;
pub use admin_service::*;
pub use identity_api::*;
pub use sales_panel::*;
pub use session_guard::*;
pub use token_decoder::*;
