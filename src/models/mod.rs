pub mod starmap;

pub use starmap::*;
