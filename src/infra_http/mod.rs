mod admin_api_http;
mod client;
mod identity_api_http;

pub use admin_api_http::*;
pub use client::*;
pub use identity_api_http::*;
