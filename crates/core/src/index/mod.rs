#![forbid(unsafe_code)]

mod alias;
mod pair;

pub use alias::*;
pub use pair::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("pair already indexed")]
    Duplicate,
    #[error("pair not indexed")]
    Missing,
}
