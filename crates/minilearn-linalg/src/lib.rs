pub mod normal;
pub mod solve;

pub use normal::*;
pub use solve::*;
