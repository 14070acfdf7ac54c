// Public library interface for diskmap-rs
// The debug CLI tool and any front-end drive the core through these modules

pub mod error;
pub mod layout;
pub mod render;
pub mod scanner;
pub mod tree;
pub mod ui;

pub use error::{DiskmapError, Result, ScanError};
