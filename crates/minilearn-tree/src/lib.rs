pub mod binning;
pub mod decision_tree;

pub use binning::*;
pub use decision_tree::*;
