#![forbid(unsafe_code)]

mod decision;
mod table;

pub use decision::*;
pub use table::*;
