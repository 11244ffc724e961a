//! Tagged entity identity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an entity held in a client store.
///
/// Optimistic inserts carry a `Local` id until the server assigns the
/// authoritative `Remote` id. Reconciliation removes the `Local` entity and
/// inserts the `Remote` one; the two are never merged by id.
///
/// Serialized untagged: a `Remote` id is a plain JSON number (what the
/// backend sends), a `Local` id is a UUID string and never leaves the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EntityId {
    Remote(i64),
    Local(Uuid),
}

impl EntityId {
    /// Mint a fresh placeholder id for an optimistic insert.
    pub fn local() -> Self {
        EntityId::Local(Uuid::new_v4())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, EntityId::Local(_))
    }

    /// Server-assigned id, if this entity has ever been acknowledged.
    pub fn as_remote(&self) -> Option<i64> {
        match self {
            EntityId::Remote(id) => Some(*id),
            EntityId::Local(_) => None,
        }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Remote(id) => write!(f, "{}", id),
            EntityId::Local(uuid) => write!(f, "local-{}", uuid),
        }
    }
}
