pub mod colors;

pub use colors::{color_of, Rgb, DEFAULT_BASE_COLOR};
