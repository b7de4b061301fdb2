//! Persisted leaderboards, pack progress, and player settings.
//!
//! The leaderboard is the only source of truth. Pack progress is a cache
//! derived from it, rebuilt on load and after every recorded result; the stored
//! copy exists for hosts that want to show it without loading the engine.
//! Writes are best effort: a failed save is logged and play carries on with the
//! in-memory state, and the next mutation writes everything again.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::*;
pub use leaderboard::*;
pub use persistence::*;
pub use profile::*;
pub use progress::*;

mod leaderboard;
mod persistence;
mod profile;
mod progress;

pub const HIGHSCORES_KEY: &str = "rowswap:highscores";
pub const PROFILE_KEY: &str = "rowswap:profile";
pub const PROGRESS_KEY: &str = "rowswap:progress";

#[derive(Clone, Debug)]
pub struct ProgressStore<P: Persistence> {
    persistence: P,
    leaderboard: Leaderboard,
    profile: PlayerProfile,
    progress: BTreeMap<Pack, PackProgress>,
}

impl<P: Persistence> ProgressStore<P> {
    /// Reads every key once. Missing or unreadable values start empty.
    pub fn load(persistence: P) -> Self {
        let leaderboard: Leaderboard = read_json(&persistence, HIGHSCORES_KEY).unwrap_or_default();
        let profile: PlayerProfile = read_json(&persistence, PROFILE_KEY).unwrap_or_default();
        let progress = derive_progress(&leaderboard);

        let cached = read_json::<BTreeMap<Pack, PackProgress>>(&persistence, PROGRESS_KEY);
        if cached.is_some_and(|cached| cached != progress) {
            log::warn!("Stored pack progress is stale, using the one derived from results");
        }

        Self {
            persistence,
            leaderboard,
            profile,
            progress,
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn progress(&self, pack: Pack) -> Option<&PackProgress> {
        self.progress.get(&pack)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }

    /// Ranks `record` in `key`'s bucket, refreshes pack progress, and writes
    /// both back. Returns the rank the record landed at.
    pub fn record_result(&mut self, key: BucketKey, record: ResultRecord) -> Option<usize> {
        let rank = self.leaderboard.record(key, record);
        log::info!("Recorded result in {}, rank {:?}", key, rank);

        self.progress = derive_progress(&self.leaderboard);
        write_json(&mut self.persistence, HIGHSCORES_KEY, &self.leaderboard);
        write_json(&mut self.persistence, PROGRESS_KEY, &self.progress);
        rank
    }

    pub fn is_puzzle_completed(&self, pack: Pack, index: usize) -> bool {
        self.progress
            .get(&pack)
            .is_some_and(|progress| progress.completed_indices.contains(&index))
    }

    pub fn is_pack_completed(&self, pack: Pack) -> bool {
        self.progress
            .get(&pack)
            .is_some_and(|progress| progress.completed_indices.len() == pack.puzzles().len())
    }

    pub fn is_pack_unlocked(&self, pack: Pack) -> bool {
        self.progress.get(&pack).is_some_and(|progress| progress.unlocked)
    }

    pub fn update_profile(&mut self, update: impl FnOnce(&mut PlayerProfile)) {
        update(&mut self.profile);
        write_json(&mut self.persistence, PROFILE_KEY, &self.profile);
    }
}

fn read_json<T: DeserializeOwned>(persistence: &impl Persistence, key: &str) -> Option<T> {
    let raw = persistence.load(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring unreadable {}: {}", key, err);
            None
        }
    }
}

fn write_json<T: Serialize>(persistence: &mut impl Persistence, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(|err| {
            log::error!("Could not serialize {}: {}", key, err);
            GameError::Persistence
        })
        .and_then(|raw| persistence.save(key, &raw));
    if let Err(err) = result {
        log::error!("Could not save {}: {}", key, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reads work, every write fails.
    #[derive(Default)]
    struct ReadOnly(MemoryPersistence);

    impl Persistence for ReadOnly {
        fn load(&self, key: &str) -> Option<String> {
            self.0.load(key)
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(GameError::Persistence)
        }
    }

    fn record(pack: Pack, index: usize, moves: u32) -> (BucketKey, ResultRecord) {
        let record = ResultRecord {
            player_label: "p".to_owned(),
            moves,
            time_remaining: 10,
            timestamp: 0,
            mode: Mode::Classic,
            size: pack.size(),
            puzzle: Some(PuzzleRef::new(pack, index)),
        };
        (BucketKey::Puzzle { pack, index }, record)
    }

    #[test]
    fn results_survive_a_reload() {
        let mut store = ProgressStore::load(MemoryPersistence::new());
        for moves in [4, 2, 3] {
            let (key, record) = record(Pack::Beginner, 1, moves);
            store.record_result(key, record);
        }

        let reloaded = ProgressStore::load(store.clone().into_persistence());

        assert_eq!(reloaded.leaderboard(), store.leaderboard());
        assert!(reloaded.is_puzzle_completed(Pack::Beginner, 1));
        assert!(!reloaded.is_puzzle_completed(Pack::Beginner, 0));
    }

    #[test]
    fn stale_progress_cache_is_not_trusted() {
        let mut persistence = MemoryPersistence::new();
        let forged: BTreeMap<Pack, PackProgress> = Pack::ALL
            .into_iter()
            .map(|pack| {
                let progress = PackProgress {
                    unlocked: true,
                    completed_indices: (0..5).collect(),
                };
                (pack, progress)
            })
            .collect();
        persistence
            .save(PROGRESS_KEY, &serde_json::to_string(&forged).unwrap())
            .unwrap();

        let store = ProgressStore::load(persistence);

        assert!(!store.is_pack_unlocked(Pack::Advanced));
        assert!(!store.is_pack_completed(Pack::Beginner));
    }

    #[test]
    fn corrupt_values_start_empty() {
        let mut persistence = MemoryPersistence::new();
        persistence.save(HIGHSCORES_KEY, "{not json").unwrap();
        persistence.save(PROFILE_KEY, "[]").unwrap();

        let store = ProgressStore::load(persistence);

        assert_eq!(store.leaderboard(), &Leaderboard::new());
        assert_eq!(store.profile(), &PlayerProfile::default());
    }

    #[test]
    fn unknown_bucket_key_keeps_other_history() {
        let (key, beginner) = record(Pack::Beginner, 0, 1);
        let stored = serde_json::json!({
            "beginner-0": [beginner],
            "expert-0": [beginner],
        });
        let mut persistence = MemoryPersistence::new();
        persistence.save(HIGHSCORES_KEY, &stored.to_string()).unwrap();

        let mut store = ProgressStore::load(persistence);
        assert!(store.is_puzzle_completed(Pack::Beginner, 0));

        let (next_key, next) = record(Pack::Beginner, 1, 2);
        store.record_result(next_key, next);

        let reloaded = ProgressStore::load(store.into_persistence());
        assert_eq!(reloaded.leaderboard().records(&key).len(), 1);
        assert!(reloaded.is_puzzle_completed(Pack::Beginner, 0));
        assert!(reloaded.is_puzzle_completed(Pack::Beginner, 1));
    }

    #[test]
    fn failed_writes_keep_in_memory_state() {
        let mut store = ProgressStore::load(ReadOnly::default());
        let (key, record) = record(Pack::Beginner, 0, 1);

        assert_eq!(store.record_result(key, record), Some(0));
        assert!(store.is_puzzle_completed(Pack::Beginner, 0));
        assert_eq!(store.persistence().0.get(HIGHSCORES_KEY), None);
    }

    #[test]
    fn profile_updates_are_written_back() {
        let mut store = ProgressStore::load(MemoryPersistence::new());
        store.update_profile(|profile| profile.player_label = "Ada".to_owned());

        let reloaded = ProgressStore::load(store.into_persistence());
        assert_eq!(reloaded.profile().player_label, "Ada");
    }

    #[test]
    fn intermediate_completes_on_its_last_result() {
        let mut store = ProgressStore::load(MemoryPersistence::new());
        let count = Pack::Intermediate.puzzles().len();
        for index in 0..count {
            assert!(!store.is_pack_completed(Pack::Intermediate));
            let (key, record) = record(Pack::Intermediate, index, 3);
            store.record_result(key, record);
        }
        assert!(store.is_pack_completed(Pack::Intermediate));
        assert!(store.is_pack_unlocked(Pack::Advanced));
    }
}
