pub mod output;
pub mod textgrid;

pub use output::*;
pub use textgrid::*;
