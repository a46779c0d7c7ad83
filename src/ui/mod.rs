//! Terminal presentation helpers.

pub mod theme;

pub use theme::{should_use_colors, SetupTheme};
