//! Engine state and reducer.

use ludex_protocol::GameRecord;

/// Snapshot of the engine's observable state.
///
/// The three operation classes (fetch, save, delete) have independent
/// lifecycles; their in-progress flags and error slots do not interfere
/// with each other, but they all mutate the same record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamesState {
    /// The record list. `None` until the first fetch commits.
    pub games: Option<Vec<GameRecord>>,
    /// A fetch is in flight.
    pub fetching: bool,
    /// Error from the last failed fetch.
    pub fetch_error: Option<String>,
    /// A save is in flight.
    pub saving: bool,
    /// Error from the last failed save.
    pub save_error: Option<String>,
    /// A delete is in flight.
    pub deleting: bool,
    /// Error from the last failed delete.
    pub delete_error: Option<String>,
}

impl GamesState {
    /// Returns the record with the given id, if present.
    pub fn find(&self, id: i64) -> Option<&GameRecord> {
        self.games
            .as_ref()
            .and_then(|games| games.iter().find(|g| g.id == Some(id)))
    }

    /// Returns the number of records in the list (0 when uninitialized).
    pub fn len(&self) -> usize {
        self.games.as_ref().map_or(0, Vec::len)
    }

    /// Returns true if the list is absent or empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An input to the reducer.
///
/// Save/delete successes and push events share the same two actions, so
/// upsert and remove follow one rule everywhere.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A fetch started.
    FetchStarted,
    /// A fetch committed a new record list.
    FetchSucceeded(Vec<GameRecord>),
    /// A fetch failed.
    FetchFailed(String),
    /// A save started.
    SaveStarted,
    /// A save (or a created/updated push event) committed a record.
    SaveSucceeded(GameRecord),
    /// A save was rejected with a version conflict. The conflict itself is
    /// surfaced to the caller, not recorded as an error here.
    SaveConflicted,
    /// A save failed.
    SaveFailed(String),
    /// A delete started.
    DeleteStarted,
    /// A delete (or a deleted push event) removed a record.
    DeleteSucceeded(GameRecord),
    /// A delete failed.
    DeleteFailed(String),
}

/// Applies an action, producing the next state.
///
/// Pure function; the caller serializes invocations.
pub fn reduce(state: &GamesState, action: Action) -> GamesState {
    let mut next = state.clone();
    match action {
        Action::FetchStarted => {
            next.fetching = true;
            next.fetch_error = None;
        }
        Action::FetchSucceeded(games) => {
            next.games = Some(games);
            next.fetching = false;
        }
        Action::FetchFailed(error) => {
            next.fetch_error = Some(error);
            next.fetching = false;
        }
        Action::SaveStarted => {
            next.saving = true;
            next.save_error = None;
        }
        Action::SaveSucceeded(record) => {
            let games = next.games.get_or_insert_with(Vec::new);
            upsert(games, record);
            next.saving = false;
        }
        Action::SaveConflicted => {
            next.saving = false;
        }
        Action::SaveFailed(error) => {
            next.save_error = Some(error);
            next.saving = false;
        }
        Action::DeleteStarted => {
            next.deleting = true;
            next.delete_error = None;
        }
        Action::DeleteSucceeded(record) => {
            if let Some(games) = next.games.as_mut() {
                remove(games, &record);
            }
            next.deleting = false;
        }
        Action::DeleteFailed(error) => {
            next.delete_error = Some(error);
            next.deleting = false;
        }
    }
    next
}

/// Insert-if-absent-else-replace-by-identifier.
///
/// Records without identifiers never match an existing entry and are
/// appended.
fn upsert(games: &mut Vec<GameRecord>, record: GameRecord) {
    match games.iter().position(|g| g.same_identity(&record)) {
        Some(index) => games[index] = record,
        None => games.push(record),
    }
}

/// Removes the entry with the record's identifier; no-op when absent or
/// when the record has no identifier.
fn remove(games: &mut Vec<GameRecord>, record: &GameRecord) {
    games.retain(|g| !g.same_identity(record));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: Option<i64>, name: &str) -> GameRecord {
        GameRecord {
            id,
            appid: 10,
            name: name.into(),
            developer: "D".into(),
            positive: 5,
            negative: 1,
            owners: "0 .. 0".into(),
            price: 0.0,
            user_id: None,
            status: None,
            version: None,
        }
    }

    fn with_games(games: Vec<GameRecord>) -> GamesState {
        GamesState {
            games: Some(games),
            ..GamesState::default()
        }
    }

    #[test]
    fn fetch_lifecycle() {
        let state = GamesState::default();
        let state = reduce(&state, Action::FetchStarted);
        assert!(state.fetching);
        assert!(state.fetch_error.is_none());

        let state = reduce(
            &state,
            Action::FetchSucceeded(vec![record(Some(1), "a")]),
        );
        assert!(!state.fetching);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn fetch_failure_keeps_previous_list() {
        let state = with_games(vec![record(Some(1), "a")]);
        let state = reduce(&state, Action::FetchStarted);
        let state = reduce(&state, Action::FetchFailed("boom".into()));

        assert_eq!(state.fetch_error.as_deref(), Some("boom"));
        assert!(!state.fetching);
        assert_eq!(state.len(), 1);
        assert_eq!(state.find(1).unwrap().name, "a");
    }

    #[test]
    fn start_clears_prior_error() {
        let state = reduce(&GamesState::default(), Action::SaveFailed("x".into()));
        assert!(state.save_error.is_some());
        let state = reduce(&state, Action::SaveStarted);
        assert!(state.save_error.is_none());
        assert!(state.saving);
    }

    #[test]
    fn save_success_appends_then_replaces() {
        let state = GamesState::default();
        let state = reduce(&state, Action::SaveSucceeded(record(Some(1), "a")));
        assert_eq!(state.len(), 1);

        let state = reduce(&state, Action::SaveSucceeded(record(Some(2), "b")));
        assert_eq!(state.len(), 2);

        let state = reduce(&state, Action::SaveSucceeded(record(Some(1), "a2")));
        assert_eq!(state.len(), 2);
        assert_eq!(state.find(1).unwrap().name, "a2");
        // Replacement happens in place; order is preserved.
        assert_eq!(state.games.as_ref().unwrap()[0].id, Some(1));
    }

    #[test]
    fn upsert_is_idempotent() {
        let state = with_games(vec![record(Some(1), "a")]);
        let once = reduce(&state, Action::SaveSucceeded(record(Some(1), "b")));
        let twice = reduce(&once, Action::SaveSucceeded(record(Some(1), "b")));
        assert_eq!(once.games, twice.games);
    }

    #[test]
    fn records_without_ids_are_appended() {
        let state = GamesState::default();
        let state = reduce(&state, Action::SaveSucceeded(record(None, "draft")));
        let state = reduce(&state, Action::SaveSucceeded(record(None, "draft")));
        // No identifier, no identity: both are kept.
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn save_conflicted_clears_flag_without_error() {
        let state = reduce(&GamesState::default(), Action::SaveStarted);
        let state = reduce(&state, Action::SaveConflicted);
        assert!(!state.saving);
        assert!(state.save_error.is_none());
    }

    #[test]
    fn delete_removes_by_identifier() {
        let state = with_games(vec![record(Some(1), "a"), record(Some(2), "b")]);
        let state = reduce(&state, Action::DeleteSucceeded(record(Some(1), "a")));
        assert_eq!(state.len(), 1);
        assert!(state.find(1).is_none());
        assert!(state.find(2).is_some());
    }

    #[test]
    fn delete_absent_is_noop() {
        let state = with_games(vec![record(Some(1), "a")]);
        let state = reduce(&state, Action::DeleteSucceeded(record(Some(9), "x")));
        assert_eq!(state.len(), 1);
        assert!(state.delete_error.is_none());

        // Deleting before any fetch initialized the list is also a no-op.
        let uninit = reduce(
            &GamesState::default(),
            Action::DeleteSucceeded(record(Some(1), "a")),
        );
        assert!(uninit.games.is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let state = with_games(vec![record(Some(1), "a")]);
        let once = reduce(&state, Action::DeleteSucceeded(record(Some(1), "a")));
        let twice = reduce(&once, Action::DeleteSucceeded(record(Some(1), "a")));
        assert_eq!(once.games, twice.games);
    }

    #[test]
    fn operation_classes_do_not_interfere() {
        let state = reduce(&GamesState::default(), Action::FetchStarted);
        let state = reduce(&state, Action::SaveStarted);
        let state = reduce(&state, Action::DeleteStarted);
        assert!(state.fetching && state.saving && state.deleting);

        let state = reduce(&state, Action::SaveFailed("s".into()));
        assert!(state.fetching && state.deleting && !state.saving);
        assert!(state.fetch_error.is_none());
        assert!(state.delete_error.is_none());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn record_strategy() -> impl Strategy<Value = GameRecord> {
            (
                prop::option::of(0i64..50),
                0i64..1000,
                "[a-z]{1,12}",
                0u32..100,
            )
                .prop_map(|(id, appid, name, positive)| GameRecord {
                    id,
                    appid,
                    name,
                    developer: "dev".into(),
                    positive,
                    negative: 0,
                    owners: "0 .. 0".into(),
                    price: 0.0,
                    user_id: None,
                    status: None,
                    version: None,
                })
        }

        proptest! {
            #[test]
            fn upsert_twice_equals_upsert_once(
                base in prop::collection::vec(record_strategy(), 0..8),
                record in record_strategy(),
            ) {
                let state = with_games(base);
                let once = reduce(&state, Action::SaveSucceeded(record.clone()));
                let twice = reduce(&once, Action::SaveSucceeded(record.clone()));
                // Identified records converge; unidentified ones append.
                if record.id.is_some() {
                    prop_assert_eq!(once.games, twice.games);
                } else {
                    prop_assert_eq!(twice.len(), once.len() + 1);
                }
            }

            #[test]
            fn list_holds_at_most_one_entry_per_id(
                base in prop::collection::vec(record_strategy(), 0..8),
                updates in prop::collection::vec(record_strategy(), 0..8),
            ) {
                let mut state = GamesState::default();
                for r in base {
                    state = reduce(&state, Action::SaveSucceeded(r));
                }
                for r in updates {
                    state = reduce(&state, Action::SaveSucceeded(r));
                }
                let games = state.games.unwrap_or_default();
                let mut ids: Vec<i64> =
                    games.iter().filter_map(|g| g.id).collect();
                let total = ids.len();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), total);
            }

            #[test]
            fn remove_then_remove_is_noop(
                base in prop::collection::vec(record_strategy(), 0..8),
                target in record_strategy(),
            ) {
                let state = with_games(base);
                let once = reduce(&state, Action::DeleteSucceeded(target.clone()));
                let twice = reduce(&once, Action::DeleteSucceeded(target));
                prop_assert_eq!(once.games, twice.games);
            }
        }
    }
}
