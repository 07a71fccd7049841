mod session_repo_file;
mod session_repo_memory;

pub use session_repo_file::*;
pub use session_repo_memory::*;
