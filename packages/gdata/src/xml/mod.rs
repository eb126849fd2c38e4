//! XML helpers shared by the normalization core and the resource methods.

mod utils;

pub use utils::*;
