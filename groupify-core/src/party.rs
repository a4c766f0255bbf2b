use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GroupifyError, TasteProfile, groupify_state::UserId};

/// A party code, e.g. `7QX2B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyId(pub String);
impl PartyId {
    pub const LENGTH: usize = 5;
    const CHARSET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    /// Draw a fresh code. Uniqueness is the registry's concern.
    pub fn random() -> Self {
        Self::from_seed(rand::random::<u128>())
    }

    fn from_seed(mut seed: u128) -> Self {
        let radix = Self::CHARSET.len() as u128;
        let mut code = String::with_capacity(Self::LENGTH);
        for _ in 0..Self::LENGTH {
            code.push(Self::CHARSET[(seed % radix) as usize] as char);
            seed /= radix;
        }
        PartyId(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<&str> for PartyId {
    fn from(value: &str) -> Self {
        PartyId(value.to_string())
    }
}

/// What the outside world gets to see of a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySummary {
    pub id: PartyId,
    /// The host's display name.
    pub host: String,
    /// Display names of every member, host first.
    pub members: Vec<String>,
    pub created_at_ms: i64,
}

/// One host and the guests whose taste is pooled with theirs.
///
/// The host is always the first member and cannot leave; closing the party
/// is the only way to drop them.
#[derive(Debug)]
pub struct Party {
    id: PartyId,
    host: Arc<TasteProfile>,
    members: RwLock<Vec<Arc<TasteProfile>>>,
    created_at: DateTime<Utc>,
}
impl Party {
    pub fn new(id: PartyId, host: TasteProfile) -> Self {
        Self::new_at(id, host, Utc::now())
    }

    pub fn new_at(id: PartyId, host: TasteProfile, created_at: DateTime<Utc>) -> Self {
        let host = Arc::new(host);
        Self {
            id,
            members: RwLock::new(vec![host.clone()]),
            host,
            created_at,
        }
    }

    pub fn id(&self) -> &PartyId {
        &self.id
    }

    pub fn host(&self) -> &Arc<TasteProfile> {
        &self.host
    }

    /// A snapshot of the current members, host first.
    pub fn members(&self) -> Vec<Arc<TasteProfile>> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|m| &m.user_id == user_id)
    }

    /// Add a guest. The duplicate and capacity checks happen under the same
    /// lock as the insertion.
    pub(crate) fn add_member(
        &self,
        profile: TasteProfile,
        max_size: Option<usize>,
    ) -> Result<Arc<TasteProfile>, GroupifyError> {
        let mut members = self
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if members.iter().any(|m| m.user_id == profile.user_id) {
            return Err(GroupifyError::DuplicateMember {
                party_id: self.id.clone(),
                user_id: profile.user_id,
            });
        }
        if let Some(max_size) = max_size
            && members.len() >= max_size
        {
            return Err(GroupifyError::Capacity {
                party_id: self.id.clone(),
                max_size,
            });
        }
        let profile = Arc::new(profile);
        members.push(profile.clone());
        Ok(profile)
    }

    /// Remove a guest, returning them if they were present.
    pub fn remove_member(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Arc<TasteProfile>>, GroupifyError> {
        if &self.host.user_id == user_id {
            return Err(GroupifyError::HostRemoval(self.id.clone()));
        }
        let mut members = self
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(members
            .iter()
            .position(|m| &m.user_id == user_id)
            .map(|index| members.remove(index)))
    }

    /// Drop every guest, keeping the host. Returns how many were dropped.
    pub fn clear_guests(&self) -> usize {
        let mut members = self
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = members.len();
        members.retain(|m| Arc::ptr_eq(m, &self.host));
        before - members.len()
    }

    /// Release every member. Only the registry calls this, after unregistering.
    pub(crate) fn close(&self) {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn summary(&self) -> PartySummary {
        PartySummary {
            id: self.id.clone(),
            host: self.host.display_name.clone(),
            members: self
                .members()
                .iter()
                .map(|m| m.display_name.clone())
                .collect(),
            created_at_ms: self.created_at.timestamp_millis(),
        }
    }
}
