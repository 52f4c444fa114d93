pub mod discover;
pub mod monitor;

pub use discover::*;
pub use monitor::*;
