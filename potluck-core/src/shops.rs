//! Shop references on shopping-list and favorite entries.
//!
//! Clients send shops either as a bare id or as a populated `{id, name}`
//! object. Both are normalized to ids before any comparison or storage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShopRef {
    Id(Uuid),
    Populated {
        id: Uuid,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ShopRef {
    pub fn id(&self) -> Uuid {
        match self {
            ShopRef::Id(id) => *id,
            ShopRef::Populated { id, .. } => *id,
        }
    }
}

/// Shop ids in first-seen order with duplicates removed.
pub fn normalize_shop_refs(refs: &[ShopRef]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(refs.len());
    for id in refs.iter().map(ShopRef::id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
