pub mod bundle;
pub mod classification;
pub mod regression;

pub use bundle::*;
pub use classification::*;
pub use regression::*;

/// Smoothing constant added to metric denominators to avoid division by zero.
pub const EPSILON: f64 = 1e-12;
