#![forbid(unsafe_code)]

mod queries;
mod tree;

pub use queries::*;
pub use tree::*;

#[cfg(test)]
mod tests;
