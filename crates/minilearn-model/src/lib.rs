pub mod lifecycle;
pub mod model;
pub mod scoring;

pub use lifecycle::*;
pub use model::*;
pub use scoring::*;
