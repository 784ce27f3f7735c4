pub mod stage0_decode;
pub mod stage1_convert;
pub mod stage2_render;

pub use stage0_decode::*;
pub use stage1_convert::*;
pub use stage2_render::*;
