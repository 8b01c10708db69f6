pub mod colors;
pub mod style;
pub mod theme;
