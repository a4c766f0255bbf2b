use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use data_encoding::HEXLOWER;

use crate::{
    Authorizer, CallbackError, GroupifyError, Party, PartyId, PartyManager, PartySettings, Role,
    groupify_state::UserId, loader,
};

/// An authorization URI that has been handed out but not yet called back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAuthentication {
    /// The party the callback belongs to; reserved but not yet registered for hosts.
    pub correlation_id: PartyId,
    /// The full state token sent upstream, `{correlation_id}:{nonce}`.
    pub state: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}
impl PendingAuthentication {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at > ttl
    }
}

/// Where to send a prospective host, and the party they'll get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAuth {
    pub uri: String,
    pub party_id: PartyId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub party_id: PartyId,
    pub user_id: UserId,
    pub role: Role,
}

/// Matches authorization callbacks to the requests that caused them.
pub struct Correlator {
    authorizer: Arc<dyn Authorizer>,
    manager: Arc<PartyManager>,
    settings: PartySettings,
}
impl Correlator {
    pub fn new(
        authorizer: Arc<dyn Authorizer>,
        manager: Arc<PartyManager>,
        settings: PartySettings,
    ) -> Self {
        Self {
            authorizer,
            manager,
            settings,
        }
    }

    fn new_state(correlation_id: &PartyId) -> String {
        let nonce: [u8; 16] = rand::random();
        format!("{correlation_id}:{}", HEXLOWER.encode(&nonce))
    }

    fn issue(&self, correlation_id: &PartyId, role: Role) -> Result<String, GroupifyError> {
        let state = Self::new_state(correlation_id);
        let uri = self.authorizer.authorize_url(role, &state)?;
        self.manager.insert_pending(PendingAuthentication {
            correlation_id: correlation_id.clone(),
            state,
            role,
            issued_at: Utc::now(),
        });
        tracing::debug!("Issued {role} authorization for {correlation_id}");
        Ok(uri)
    }

    /// Reserve a party id and issue the host authorization URI for it.
    pub fn begin_host_auth(&self) -> Result<HostAuth, GroupifyError> {
        let party_id = self.manager.reserve_id();
        match self.issue(&party_id, Role::Host) {
            Ok(uri) => Ok(HostAuth { uri, party_id }),
            Err(e) => {
                self.manager.release_reservation(&party_id);
                Err(e)
            }
        }
    }

    /// Issue a guest authorization URI for an existing party.
    pub fn begin_guest_auth(&self, party_id: &PartyId) -> Result<String, GroupifyError> {
        let party = self
            .manager
            .get(party_id)
            .ok_or_else(|| GroupifyError::PartyNotFound(party_id.clone()))?;
        if let Some(max_size) = self.settings.max_size
            && party.len() >= max_size
        {
            return Err(GroupifyError::Capacity {
                party_id: party_id.clone(),
                max_size,
            });
        }
        self.issue(party_id, Role::Guest)
    }

    /// Complete an authorization: exchange the code, load the user's taste
    /// profile, and create the party or join it.
    ///
    /// If the exchange or the load fails the pending authentication is put
    /// back, so the user can try again. Attaching happens at most once per
    /// issued state.
    pub async fn on_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<CallbackOutcome, CallbackError> {
        if code.is_empty() {
            return Err(CallbackError::MissingField("code"));
        }
        if state.is_empty() {
            return Err(CallbackError::MissingField("state"));
        }

        let correlation_id = PartyId(
            state
                .split_once(':')
                .map_or(state, |(id, _)| id)
                .to_string(),
        );
        let pending = match self.manager.claim_pending(
            &correlation_id,
            state,
            Utc::now(),
            self.settings.pending_auth_ttl(),
        ) {
            Ok(pending) => pending,
            Err(e @ CallbackError::StateMismatch(_)) => {
                tracing::warn!("Rejected callback for {correlation_id}: state does not match");
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let role = pending.role;

        let session = match self.authorizer.exchange_code(role, code).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Code exchange for {correlation_id} failed: {e}");
                self.manager.restore_pending(pending);
                return Err(CallbackError::UpstreamAuthFailure(e));
            }
        };
        let profile = match loader::load_taste_profile(session, role).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Loading {role} profile for {correlation_id} failed: {e}");
                self.manager.restore_pending(pending);
                return Err(CallbackError::ProfileLoad(e));
            }
        };
        let user_id = profile.user_id.clone();

        match role {
            Role::Host => {
                self.manager
                    .register(Party::new(correlation_id.clone(), profile));
            }
            Role::Guest => {
                let party = self.manager.get(&correlation_id).ok_or_else(|| {
                    CallbackError::Attach(Box::new(GroupifyError::PartyNotFound(
                        correlation_id.clone(),
                    )))
                })?;
                let profile = party
                    .add_member(profile, self.settings.max_size)
                    .map_err(|e| CallbackError::Attach(Box::new(e)))?;
                tracing::info!(
                    "{} joined party {correlation_id} ({} members)",
                    profile.display_name,
                    party.len()
                );
            }
        }

        Ok(CallbackOutcome {
            party_id: correlation_id,
            user_id,
            role,
        })
    }
}
