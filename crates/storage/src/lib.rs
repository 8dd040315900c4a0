#![forbid(unsafe_code)]

//! Durable outline store: a per-table delta cache in front of SQLite, and an
//! [`Outline`] node API with attribute nodes, display order and aliases.

mod outline;
mod store;

pub use outline::*;
pub use store::*;
