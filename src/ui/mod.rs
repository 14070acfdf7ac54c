pub mod input;
pub mod navigation;
pub mod snapshot;
pub mod tooltip;
