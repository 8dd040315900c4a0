#![forbid(unsafe_code)]

mod clock;
mod ids;
mod schema;

pub(crate) use clock::*;
pub(super) use ids::*;
pub(super) use schema::{install_schema, schema_version};
