pub mod screen;
pub mod table;

pub use screen::*;
pub use table::*;
