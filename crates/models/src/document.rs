use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Chirp, RefreshToken, User};

/// The whole persisted state, written to disk as one JSON value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub refresh_tokens: BTreeMap<String, RefreshToken>,
    #[serde(default)]
    pub next_ids: NextIds,
}

/// Next IDs to hand out. Persisted so that deleting the highest record does
/// not recycle its ID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextIds {
    #[serde(default)]
    pub chirp: u64,
    #[serde(default)]
    pub user: u64,
}

fn next_after<V>(map: &BTreeMap<u64, V>, persisted: u64) -> u64 {
    let after_max = map.keys().next_back().map_or(1, |max| max + 1);
    after_max.max(persisted).max(1)
}

impl StoreDocument {
    /// Reserve the next chirp ID.
    pub fn allocate_chirp_id(&mut self) -> u64 {
        let id = next_after(&self.chirps, self.next_ids.chirp);
        self.next_ids.chirp = id + 1;
        id
    }

    /// Reserve the next user ID.
    pub fn allocate_user_id(&mut self) -> u64 {
        let id = next_after(&self.users, self.next_ids.user);
        self.next_ids.user = id + 1;
        id
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }
}
