pub mod interval;
pub mod metadata;
pub mod sentence;

pub use interval::*;
pub use metadata::*;
pub use sentence::*;
