#![forbid(unsafe_code)]

use super::super::{StoreError, Table};
use ol_core::NodeId;

pub(in crate::store) fn id_text(id: NodeId) -> String {
    id.to_string()
}

pub(in crate::store) fn parse_id(table: Table, raw: &str) -> Result<NodeId, StoreError> {
    NodeId::parse(raw).map_err(|err| StoreError::corrupt_id(table, err))
}
