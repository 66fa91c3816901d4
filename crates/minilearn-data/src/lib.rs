pub mod csv_loader;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod scaler;

pub use csv_loader::*;
pub use dataset::*;
pub use encoder::*;
pub use error::{DataError, DataResult};
pub use scaler::*;
