use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use chrono::{DateTime, Duration, Utc};

use crate::{CallbackError, Party, PartyId, PartySettings, PendingAuthentication, Role};

#[derive(Default)]
struct Registry {
    parties: HashMap<PartyId, Arc<Party>>,
    /// Ids handed out to hosts who haven't finished authorizing yet.
    reserved: HashSet<PartyId>,
    /// Keyed by correlation id. Guests of the same party share a key.
    pending: HashMap<PartyId, Vec<PendingAuthentication>>,
}
impl Registry {
    fn is_taken(&self, id: &PartyId) -> bool {
        self.parties.contains_key(id) || self.reserved.contains(id)
    }

    fn sweep_expired(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut released = vec![];
        let mut swept = 0;
        self.pending.retain(|_, entries| {
            entries.retain(|entry| {
                if entry.is_expired(now, ttl) {
                    if entry.role == Role::Host {
                        released.push(entry.correlation_id.clone());
                    }
                    swept += 1;
                    false
                } else {
                    true
                }
            });
            !entries.is_empty()
        });
        for id in released {
            self.reserved.remove(&id);
        }
        swept
    }
}

/// What a single reaper pass removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReapReport {
    pub parties: Vec<PartyId>,
    pub pending: usize,
}
impl ReapReport {
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty() && self.pending == 0
    }
}

/// The process-wide registry of parties and in-flight authentications.
///
/// Every read and write goes through one mutex, including the reaper's.
/// Parties are closed after the lock is released.
#[derive(Default)]
pub struct PartyManager {
    registry: Mutex<Registry>,
}
impl PartyManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Draw an id that is neither registered nor reserved, and reserve it.
    pub fn reserve_id(&self) -> PartyId {
        let mut registry = self.lock();
        loop {
            let id = PartyId::random();
            if !registry.is_taken(&id) {
                registry.reserved.insert(id.clone());
                return id;
            }
            tracing::debug!("Party id {id} already taken, redrawing");
        }
    }

    pub fn release_reservation(&self, id: &PartyId) {
        self.lock().reserved.remove(id);
    }

    /// Register a party, consuming its id's reservation if it had one.
    pub fn register(&self, party: Party) -> Arc<Party> {
        let party = Arc::new(party);
        let replaced = {
            let mut registry = self.lock();
            registry.reserved.remove(party.id());
            registry.parties.insert(party.id().clone(), party.clone())
        };
        if let Some(replaced) = replaced {
            tracing::warn!("Replaced existing party {}", replaced.id());
            replaced.close();
        }
        tracing::info!(
            "Registered party {} hosted by {}",
            party.id(),
            party.host().display_name
        );
        party
    }

    /// Remove a party and any authentications still pending for it, then close it.
    /// Does nothing if the party isn't registered.
    pub fn unregister(&self, id: &PartyId) -> Option<Arc<Party>> {
        let party = {
            let mut registry = self.lock();
            registry.pending.remove(id);
            registry.parties.remove(id)
        }?;
        party.close();
        tracing::info!("Unregistered party {id}");
        Some(party)
    }

    pub fn get(&self, id: &PartyId) -> Option<Arc<Party>> {
        self.lock().parties.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn party_ids(&self) -> Vec<PartyId> {
        let mut ids: Vec<_> = self.lock().parties.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn insert_pending(&self, pending: PendingAuthentication) {
        self.lock()
            .pending
            .entry(pending.correlation_id.clone())
            .or_default()
            .push(pending);
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.values().map(Vec::len).sum()
    }

    /// Atomically find and remove the pending authentication that issued `state`.
    ///
    /// Of any number of concurrent claims for the same state, at most one succeeds.
    pub fn claim_pending(
        &self,
        correlation_id: &PartyId,
        state: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<PendingAuthentication, CallbackError> {
        let mut registry = self.lock();
        let entries = registry
            .pending
            .get_mut(correlation_id)
            .ok_or_else(|| CallbackError::UnknownCorrelation(correlation_id.to_string()))?;
        let index = entries
            .iter()
            .position(|entry| entry.state == state)
            .ok_or_else(|| CallbackError::StateMismatch(correlation_id.to_string()))?;

        let pending = entries.remove(index);
        if entries.is_empty() {
            registry.pending.remove(correlation_id);
        }

        if pending.is_expired(now, ttl) {
            if pending.role == Role::Host {
                registry.reserved.remove(correlation_id);
            }
            tracing::debug!(
                "Pending {} authentication for {correlation_id} expired",
                pending.role
            );
            return Err(CallbackError::UnknownCorrelation(correlation_id.to_string()));
        }
        Ok(pending)
    }

    /// Put back a claimed authentication whose completion failed, so it can be retried.
    pub fn restore_pending(&self, pending: PendingAuthentication) {
        let mut registry = self.lock();
        if pending.role == Role::Guest && !registry.parties.contains_key(&pending.correlation_id) {
            tracing::debug!(
                "Not restoring guest authentication for closed party {}",
                pending.correlation_id
            );
            return;
        }
        registry
            .pending
            .entry(pending.correlation_id.clone())
            .or_default()
            .push(pending);
    }

    /// Unregister parties older than `max_age` and drop expired authentications.
    pub fn reap(&self, now: DateTime<Utc>, max_age: Duration, ttl: Duration) -> ReapReport {
        let (reaped, pending) = {
            let mut registry = self.lock();
            let stale: Vec<PartyId> = registry
                .parties
                .values()
                .filter(|party| now - party.created_at() > max_age)
                .map(|party| party.id().clone())
                .collect();
            let mut reaped = Vec::with_capacity(stale.len());
            for id in stale {
                registry.pending.remove(&id);
                if let Some(party) = registry.parties.remove(&id) {
                    reaped.push(party);
                }
            }
            (reaped, registry.sweep_expired(now, ttl))
        };

        let mut report = ReapReport {
            parties: Vec::with_capacity(reaped.len()),
            pending,
        };
        for party in reaped {
            tracing::warn!(
                "Reaping party {} created at {}",
                party.id(),
                party.created_at()
            );
            party.close();
            report.parties.push(party.id().clone());
        }
        report.parties.sort();
        report
    }

    /// Run [`Self::reap`] on the configured interval until the manager is dropped.
    pub fn spawn_reaper(self: &Arc<Self>, settings: &PartySettings) -> tokio::task::JoinHandle<()> {
        let manager: Weak<Self> = Arc::downgrade(self);
        let period = settings.reaper_interval();
        let max_age = settings.max_age();
        let ttl = settings.pending_auth_ttl();

        tokio::spawn(async move {
            let now = tokio::time::Instant::now();
            let mut interval =
                tokio::time::interval_at(now.checked_add(period).unwrap_or(now), period);
            loop {
                interval.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                let report = manager.reap(Utc::now(), max_age, ttl);
                if !report.is_empty() {
                    tracing::info!(
                        "Reaper removed {} parties and {} pending authentications",
                        report.parties.len(),
                        report.pending
                    );
                }
            }
        })
    }
}
