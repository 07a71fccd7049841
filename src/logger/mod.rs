//! Console logging on top of `tracing`. Output goes to stderr so command
//! results on stdout stay clean.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
