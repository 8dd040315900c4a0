#![forbid(unsafe_code)]

use super::Table;
use ol_core::NodeIdError;
use ol_core::delta::Rejection;
use ol_core::graph::TreeError;
use ol_core::index::IndexError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("store is not attached to a database file")]
    NotAttached,
    #[error("database file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("corrupt id in table {table}: {value}")]
    CorruptId { table: Table, value: String },
    #[error("no root node found")]
    InvalidRoot,

    #[error("{table}: {reason}")]
    Rejected { table: Table, reason: Rejection },

    #[error("invalid parent")]
    InvalidParent,
    #[error("invalid node")]
    InvalidNode,
    #[error("node already exists")]
    NodeAlreadyExists,
    #[error("operation not allowed on the root node")]
    IsRoot,
    #[error("invalid heading: {0:?}")]
    InvalidHeading(String),
    #[error("duplicate child heading: {0}")]
    DuplicateChildHeading(String),
    #[error("alias source not found")]
    AliasSourceNotFound,
    #[error("alias destination not found")]
    AliasDestinationNotFound,
    #[error("alias source equals destination")]
    AliasSourceEqualsDestination,
    #[error("alias source is an ancestor of the destination")]
    AliasSourceIsAncestor,
    #[error("alias already exists")]
    AliasAlreadyExists,
    #[error("only top-level alias placements can be erased directly")]
    NonTopAlias,
    #[error("ordering does not match the current children")]
    InvalidOrdering,
    #[error("missing {0} for node")]
    MissingValue(Table),
}

impl From<TreeError> for StoreError {
    fn from(value: TreeError) -> Self {
        match value {
            TreeError::InvalidParent => Self::InvalidParent,
            TreeError::ChildAlreadyExists => Self::NodeAlreadyExists,
            TreeError::InvalidNode => Self::InvalidNode,
        }
    }
}

impl From<IndexError> for StoreError {
    fn from(value: IndexError) -> Self {
        match value {
            IndexError::Duplicate => Self::AliasAlreadyExists,
            IndexError::Missing => Self::InvalidNode,
        }
    }
}

impl StoreError {
    pub(crate) fn corrupt_id(table: Table, err: NodeIdError) -> Self {
        let value = match err {
            NodeIdError::Empty => String::new(),
            NodeIdError::Malformed { value } => value,
        };
        Self::CorruptId { table, value }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
