pub mod prober;
pub mod system;

pub use prober::*;
pub use system::*;
