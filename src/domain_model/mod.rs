mod catalog;
mod sales;
mod session;
mod token;
mod upload;
mod user;

pub use catalog::*;
pub use sales::*;
pub use session::*;
pub use token::*;
pub use upload::*;
pub use user::*;
