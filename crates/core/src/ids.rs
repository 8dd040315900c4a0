#![forbid(unsafe_code)]

use std::fmt;
use uuid::Uuid;

/// Opaque 128-bit node identifier.
///
/// Fresh ids are random (UUID v4). Ids are never reused or mutated; the
/// textual form is the lowercase hyphenated UUID, which is also what the
/// durable tables store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn parse(value: &str) -> Result<Self, NodeIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(NodeIdError::Empty);
        }
        let uuid = Uuid::parse_str(trimmed).map_err(|_| NodeIdError::Malformed {
            value: trimmed.to_string(),
        })?;
        Ok(Self(uuid))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for NodeId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    #[error("node id must not be empty")]
    Empty,
    #[error("malformed node id: {value}")]
    Malformed { value: String },
}

pub fn new_node_id() -> NodeId {
    NodeId::new()
}

/// Identity of the alias placement "`source` also appears under `destination`".
///
/// XOR of the two operands: deterministic, and symmetric, so
/// `alias_id(a, b) == alias_id(b, a)`. Anything keyed by an alias id must
/// carry the (source, destination) direction next to it.
pub fn alias_id(source: NodeId, destination: NodeId) -> NodeId {
    NodeId::from_u128(source.as_u128() ^ destination.as_u128())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        let id = NodeId::new();
        assert_eq!(NodeId::parse(&id.to_string()).unwrap(), id);
        assert_eq!(NodeId::parse("  ").unwrap_err(), NodeIdError::Empty);
        assert!(matches!(
            NodeId::parse("not-a-uuid").unwrap_err(),
            NodeIdError::Malformed { .. }
        ));
    }

    #[test]
    fn alias_id_recovers_either_operand() {
        let src = NodeId::new();
        let dst = NodeId::new();
        let alias = alias_id(src, dst);
        assert_eq!(alias_id(alias, dst), src);
        assert_eq!(alias_id(alias, src), dst);
        assert_ne!(alias, src);
        assert_eq!(alias_id(src, src), NodeId::nil());
    }
}
