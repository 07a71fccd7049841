mod navigator;
mod session_repo;

pub use navigator::*;
pub use session_repo::*;
