//! Console settings: a TOML file picked by build profile (or `--settings`)
//! with `ADMIN_` environment overrides, plus the clap command line.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
