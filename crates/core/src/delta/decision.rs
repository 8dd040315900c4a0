#![forbid(unsafe_code)]

use std::fmt;

/// One pending, not yet durable mutation of a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delta<V> {
    Created(V),
    Updated(V),
    Erased,
}

impl<V> Delta<V> {
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Created(value) | Self::Updated(value) => Some(value),
            Self::Erased => None,
        }
    }

    pub fn is_erased(&self) -> bool {
        matches!(self, Self::Erased)
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Cache state of a key at the moment a mutation is requested.
/// Variants are in priority order.
#[derive(Debug)]
pub enum Classification<'a, V> {
    DeltaExists(&'a [Delta<V>]),
    CachedOnly(&'a V),
    NoRecord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    AppendCreated,
    AppendUpdated,
    AppendErased,
    /// Drop the whole delta log; the key never reached disk.
    Retract,
    NoOp,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AppendCreated => "created",
            Self::AppendUpdated => "updated",
            Self::AppendErased => "erased",
            Self::Retract => "retract",
            Self::NoOp => "no-op",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("item previously deleted")]
    PreviouslyDeleted,
    #[error("nothing to delete")]
    NothingToDelete,
}

pub fn decide_push<V: PartialEq>(state: &Classification<'_, V>, value: &V) -> Result<Decision, Rejection> {
    match state {
        Classification::DeltaExists(log) => match log.last() {
            Some(Delta::Erased) => Err(Rejection::PreviouslyDeleted),
            Some(last) if last.value() == Some(value) => Ok(Decision::NoOp),
            _ => Ok(Decision::AppendUpdated),
        },
        Classification::CachedOnly(cached) if *cached == value => Ok(Decision::NoOp),
        Classification::CachedOnly(_) => Ok(Decision::AppendUpdated),
        Classification::NoRecord => Ok(Decision::AppendCreated),
    }
}

pub fn decide_erase<V>(state: &Classification<'_, V>) -> Result<Decision, Rejection> {
    match state {
        Classification::DeltaExists(log) => {
            match log.last() {
                Some(Delta::Erased) => Err(Rejection::PreviouslyDeleted),
                Some(Delta::Created(_)) => Ok(Decision::Retract),
                _ => Ok(Decision::AppendErased),
            }
        }
        Classification::CachedOnly(_) => Ok(Decision::AppendErased),
        Classification::NoRecord => Err(Rejection::NothingToDelete),
    }
}
