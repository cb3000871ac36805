//! The synchronization state machine.

use crate::api::{ApiError, GameApi};
use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::error::{SyncError, SyncResult};
use crate::policy::SyncPolicy;
use crate::state::{reduce, Action, GamesState};
use ludex_protocol::{EditConflict, GameRecord, PushEvent, PushEventKind};
use ludex_store::KeyValueStore;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// The outcome of a save call.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The record was committed; carries the persisted copy.
    Saved(GameRecord),
    /// The server rejected the edit with a version conflict. The state
    /// machine records no error; resolving and re-saving is up to the
    /// caller.
    Conflict(EditConflict),
}

/// The sync engine: remote CRUD with a policy-driven local fallback,
/// funneling every outcome through one reducer.
///
/// All observable state lives behind [`state`]; operations dispatch
/// actions against it under a write lock, so the last completion wins
/// regardless of which operation class or the push channel produced it.
///
/// [`state`]: SyncMachine::state
pub struct SyncMachine<A: GameApi, S: KeyValueStore> {
    config: EngineConfig,
    policy: SyncPolicy,
    api: Arc<A>,
    store: Arc<S>,
    state: RwLock<GamesState>,
}

impl<A: GameApi, S: KeyValueStore> SyncMachine<A, S> {
    /// Creates an engine over the given API and store.
    pub fn new(config: EngineConfig, policy: SyncPolicy, api: Arc<A>, store: Arc<S>) -> Self {
        Self {
            config,
            policy,
            api,
            store,
            state: RwLock::new(GamesState::default()),
        }
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> GamesState {
        self.state.read().clone()
    }

    /// Returns the engine's policy.
    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns a shared handle to the API.
    pub fn api_handle(&self) -> Arc<A> {
        Arc::clone(&self.api)
    }

    /// Returns a shared handle to the local store.
    pub fn store_handle(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Applies one action to the state.
    pub fn dispatch(&self, action: Action) {
        let mut state = self.state.write();
        *state = reduce(&state, action);
    }

    /// Fetches the record list.
    ///
    /// On remote success the list is committed wholesale. Under
    /// [`SyncPolicy::FailSilent`] a remote failure falls back to the
    /// mirrored records in the local store; under
    /// [`SyncPolicy::FailVisible`] it is recorded on `fetch_error` and
    /// returned. A fetch whose token was cancelled commits nothing.
    pub fn fetch(&self, cancel: &CancelToken) -> SyncResult<()> {
        self.dispatch(Action::FetchStarted);

        match self.api.list() {
            Ok(games) => {
                if cancel.is_cancelled() {
                    return Err(SyncError::Cancelled);
                }
                if self.policy.mirrors_remote() {
                    self.mirror_all(&games);
                }
                tracing::debug!(count = games.len(), "fetch committed");
                self.dispatch(Action::FetchSucceeded(games));
                Ok(())
            }
            Err(error) if self.policy.masks_failures() => {
                tracing::warn!(%error, "fetch failed, serving local store");
                let games = match self.load_local() {
                    Ok(games) => games,
                    Err(error) => {
                        self.dispatch(Action::FetchFailed(error.to_string()));
                        return Err(error);
                    }
                };
                if cancel.is_cancelled() {
                    return Err(SyncError::Cancelled);
                }
                self.dispatch(Action::FetchSucceeded(games));
                Ok(())
            }
            Err(error) => {
                self.dispatch(Action::FetchFailed(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Saves a record: create when it has no id, update otherwise.
    ///
    /// A version conflict comes back as [`SaveOutcome::Conflict`] and
    /// leaves the list untouched. Under [`SyncPolicy::FailSilent`] any
    /// other remote failure retargets the save at the local store, minting
    /// an id for new records.
    pub fn save(&self, record: GameRecord) -> SyncResult<SaveOutcome> {
        self.dispatch(Action::SaveStarted);

        let result = if record.is_new() {
            self.api.create(&record)
        } else {
            self.api.update(&record)
        };

        match result {
            Ok(saved) => {
                if self.policy.mirrors_remote() {
                    self.mirror_one(&saved);
                }
                self.dispatch(Action::SaveSucceeded(saved.clone()));
                Ok(SaveOutcome::Saved(saved))
            }
            Err(ApiError::Conflict(conflict)) => {
                tracing::debug!(id = ?conflict.local.id, "save rejected with version conflict");
                self.dispatch(Action::SaveConflicted);
                Ok(SaveOutcome::Conflict(*conflict))
            }
            Err(error) if self.policy.masks_failures() => {
                tracing::warn!(%error, "save failed, writing to local store");
                self.save_local(record)
            }
            Err(error) => {
                self.dispatch(Action::SaveFailed(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Deletes a record.
    ///
    /// A record that was never persisted (no id) has nothing to delete;
    /// the call completes without touching the API. Under
    /// [`SyncPolicy::FailSilent`] a remote failure removes the local
    /// mirror entry instead.
    pub fn delete(&self, record: GameRecord) -> SyncResult<()> {
        self.dispatch(Action::DeleteStarted);

        let Some(id) = record.id else {
            self.dispatch(Action::DeleteSucceeded(record));
            return Ok(());
        };

        match self.api.delete_by_id(id) {
            Ok(()) => {
                if self.policy.mirrors_remote() {
                    self.unmirror(&record);
                }
                self.dispatch(Action::DeleteSucceeded(record));
                Ok(())
            }
            Err(error) if self.policy.masks_failures() => {
                tracing::warn!(%error, "delete failed, removing from local store");
                if let Some(key) = record.storage_key() {
                    if let Err(error) = self.store.remove(&key) {
                        self.dispatch(Action::DeleteFailed(error.to_string()));
                        return Err(error.into());
                    }
                }
                self.dispatch(Action::DeleteSucceeded(record));
                Ok(())
            }
            Err(error) => {
                self.dispatch(Action::DeleteFailed(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Applies a push event to the state.
    ///
    /// Created and updated events upsert the payload; deleted events
    /// remove it. Events reuse the save/delete success actions, so a push
    /// update and a local save converge on the same list shape.
    pub fn apply_push_event(&self, event: PushEvent) {
        match event.event {
            PushEventKind::Created | PushEventKind::Updated => {
                self.dispatch(Action::SaveSucceeded(event.payload));
            }
            PushEventKind::Deleted => {
                self.dispatch(Action::DeleteSucceeded(event.payload));
            }
        }
    }

    /// Writes the save to the local store and commits it as a success.
    fn save_local(&self, mut record: GameRecord) -> SyncResult<SaveOutcome> {
        if record.id.is_none() {
            record.id = Some(mint_offline_id());
        }
        // id is set by now, so the key exists.
        let key = record.storage_key().unwrap_or_default();
        let json = match record.encode() {
            Ok(json) => json,
            Err(error) => {
                self.dispatch(Action::SaveFailed(error.to_string()));
                return Err(error.into());
            }
        };
        if let Err(error) = self.store.set(&key, &json) {
            self.dispatch(Action::SaveFailed(error.to_string()));
            return Err(error.into());
        }
        self.dispatch(Action::SaveSucceeded(record.clone()));
        Ok(SaveOutcome::Saved(record))
    }

    /// Reads every mirrored record from the store, skipping entries that
    /// no longer decode and scoping to the configured user when set.
    fn load_local(&self) -> SyncResult<Vec<GameRecord>> {
        let mut games = Vec::new();
        for key in self.store.keys()? {
            let Some(json) = self.store.get(&key)? else {
                continue;
            };
            match GameRecord::decode(&json) {
                Ok(record) => {
                    let mine = match (self.config.user_id, record.user_id) {
                        (Some(owner), Some(user)) => owner == user,
                        (Some(_), None) => false,
                        (None, _) => true,
                    };
                    if mine {
                        games.push(record);
                    }
                }
                Err(error) => {
                    tracing::debug!(%key, %error, "skipping undecodable store entry");
                }
            }
        }
        Ok(games)
    }

    /// Mirrors one remote result into the store. Best effort: a mirror
    /// failure never fails the remote operation that produced it.
    fn mirror_one(&self, record: &GameRecord) {
        let Some(key) = record.storage_key() else {
            return;
        };
        match record.encode() {
            Ok(json) => {
                if let Err(error) = self.store.set(&key, &json) {
                    tracing::warn!(%key, %error, "failed to mirror record");
                }
            }
            Err(error) => tracing::warn!(%key, %error, "failed to encode record for mirror"),
        }
    }

    fn mirror_all(&self, games: &[GameRecord]) {
        for record in games {
            self.mirror_one(record);
        }
    }

    fn unmirror(&self, record: &GameRecord) {
        if let Some(key) = record.storage_key() {
            if let Err(error) = self.store.remove(&key) {
                tracing::warn!(%key, %error, "failed to remove mirrored record");
            }
        }
    }

    /// Returns a handler suitable for [`crate::PushChannel::open`].
    ///
    /// Events arriving after the token is cancelled are dropped, so a
    /// torn-down view never sees late pushes.
    pub fn push_handler(
        self: &Arc<Self>,
        cancel: CancelToken,
    ) -> impl Fn(PushEvent) + Send + 'static
    where
        A: 'static,
        S: 'static,
    {
        let machine = Arc::clone(self);
        move |event| {
            if cancel.is_cancelled() {
                tracing::debug!("dropping push event after cancellation");
                return;
            }
            machine.apply_push_event(event);
        }
    }
}

/// Mints an identifier for a record saved while the backend is
/// unreachable: milliseconds since the epoch, like the original client.
/// Good enough for a single local writer; reconciliation with
/// server-assigned ids is out of scope.
fn mint_offline_id() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
