mod implementor_board;
mod register_ext;

pub use implementor_board::*;
pub use register_ext::*;
