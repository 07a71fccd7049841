mod navigator;
mod render;

pub use navigator::*;
pub use render::*;
