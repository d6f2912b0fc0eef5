//! Draw styling.

mod color;
mod style;

pub use color::Color;
pub use style::{Style, StyleUniform};
