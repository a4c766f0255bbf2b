use std::sync::Arc;

use crate::{
    AggregationConfig, Authorizer, CallbackError, CallbackOutcome, Config, Correlator,
    GroupifyError, HostAuth, Party, PartyId, PartyManager, PartySummary, PlaylistRef,
    SpotifyAuthorizer, aggregate, assembly, groupify_state::UserId, loader,
};

/// The operations the outside world drives a Groupify instance with.
pub struct Groupify {
    config: Config,
    manager: Arc<PartyManager>,
    correlator: Correlator,
}
impl Groupify {
    pub fn new(config: Config) -> Self {
        let authorizer = Arc::new(SpotifyAuthorizer::new(&config));
        Self::with_authorizer(config, authorizer)
    }

    pub fn with_authorizer(config: Config, authorizer: Arc<dyn Authorizer>) -> Self {
        let manager = Arc::new(PartyManager::new());
        let correlator = Correlator::new(authorizer, manager.clone(), config.party.clone());
        Self {
            config,
            manager,
            correlator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manager(&self) -> &Arc<PartyManager> {
        &self.manager
    }

    pub fn begin_host_auth(&self) -> Result<HostAuth, GroupifyError> {
        self.correlator.begin_host_auth()
    }

    pub fn begin_guest_auth(&self, party_id: &PartyId) -> Result<String, GroupifyError> {
        self.correlator.begin_guest_auth(party_id)
    }

    pub async fn on_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<CallbackOutcome, CallbackError> {
        self.correlator.on_callback(code, state).await
    }

    fn party(&self, party_id: &PartyId) -> Result<Arc<Party>, GroupifyError> {
        self.manager
            .get(party_id)
            .ok_or_else(|| GroupifyError::PartyNotFound(party_id.clone()))
    }

    /// Aggregate the party's taste and write it to a new playlist on the host's account.
    pub async fn make_playlist(
        &self,
        party_id: &PartyId,
        config: &AggregationConfig,
    ) -> Result<PlaylistRef, GroupifyError> {
        let party = self.party(party_id)?;
        let members = party.members();
        if members.is_empty() {
            // Closed between the lookup and the snapshot.
            return Err(GroupifyError::PartyNotFound(party_id.clone()));
        }
        let host = party.host();

        let candidates = aggregate::aggregate(&members, config, host.session.as_ref()).await?;
        tracing::info!(
            "Party {party_id}: {} candidate tracks from {} members at strictness {}",
            candidates.len(),
            members.len(),
            config.threshold()
        );

        let names: Vec<String> = members.iter().map(|m| m.display_name.clone()).collect();
        assembly::assemble(candidates, config, host, &names, &self.config.playlist.name).await
    }

    pub fn remove_party(&self, party_id: &PartyId) -> Result<(), GroupifyError> {
        self.manager
            .unregister(party_id)
            .map(|_| ())
            .ok_or_else(|| GroupifyError::PartyNotFound(party_id.clone()))
    }

    pub fn list_party(&self, party_id: &PartyId) -> Result<PartySummary, GroupifyError> {
        Ok(self.party(party_id)?.summary())
    }

    pub fn remove_member(&self, party_id: &PartyId, user_id: &UserId) -> Result<(), GroupifyError> {
        let removed = self.party(party_id)?.remove_member(user_id)?;
        match removed {
            Some(profile) => {
                tracing::info!("{} left party {party_id}", profile.display_name);
                Ok(())
            }
            None => Err(GroupifyError::MemberNotFound {
                party_id: party_id.clone(),
                user_id: user_id.clone(),
            }),
        }
    }

    /// Drop every guest, keeping the host. Returns how many were dropped.
    pub fn clear_party(&self, party_id: &PartyId) -> Result<usize, GroupifyError> {
        let cleared = self.party(party_id)?.clear_guests();
        tracing::info!("Cleared {cleared} guests from party {party_id}");
        Ok(cleared)
    }

    /// Unfollow every playlist on the host's account that carries the
    /// configured playlist name and is owned by the host. Returns how many
    /// were unfollowed.
    pub async fn purge_playlists(&self, party_id: &PartyId) -> Result<usize, GroupifyError> {
        let party = self.party(party_id)?;
        let host = party.host();
        let playlists = host.session.playlists(loader::PLAYLISTS_TO_RETRIEVE).await?;

        let mut purged = 0;
        for playlist in playlists
            .iter()
            .filter(|p| p.name == self.config.playlist.name && p.owner.id == host.user_id.0)
        {
            host.session.unfollow_playlist(&playlist.id).await?;
            purged += 1;
        }
        tracing::info!("Purged {purged} playlists for party {party_id}");
        Ok(purged)
    }

    pub fn spawn_reaper(&self) -> tokio::task::JoinHandle<()> {
        self.manager.spawn_reaper(&self.config.party)
    }
}
