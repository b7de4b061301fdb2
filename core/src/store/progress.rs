use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::*;

/// Snapshot of one pack, derived from the leaderboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackProgress {
    pub unlocked: bool,
    pub completed_indices: BTreeSet<usize>,
}

pub fn is_puzzle_completed(leaderboard: &Leaderboard, pack: Pack, index: usize) -> bool {
    leaderboard.has_records(&BucketKey::Puzzle { pack, index })
}

pub fn is_pack_completed(leaderboard: &Leaderboard, pack: Pack) -> bool {
    (0..pack.puzzles().len()).all(|index| is_puzzle_completed(leaderboard, pack, index))
}

/// A pack opens once its prerequisite pack is completed.
pub fn is_pack_unlocked(leaderboard: &Leaderboard, pack: Pack) -> bool {
    pack.prerequisite()
        .is_none_or(|prerequisite| is_pack_completed(leaderboard, prerequisite))
}

/// Progress of every pack, recomputed from scratch.
pub fn derive_progress(leaderboard: &Leaderboard) -> BTreeMap<Pack, PackProgress> {
    Pack::ALL
        .into_iter()
        .map(|pack| {
            let completed_indices = (0..pack.puzzles().len())
                .filter(|&index| is_puzzle_completed(leaderboard, pack, index))
                .collect();
            let progress = PackProgress {
                unlocked: is_pack_unlocked(leaderboard, pack),
                completed_indices,
            };
            (pack, progress)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finish(leaderboard: &mut Leaderboard, pack: Pack, index: usize) {
        let record = ResultRecord {
            player_label: "p".to_owned(),
            moves: 1,
            time_remaining: 10,
            timestamp: 0,
            mode: Mode::Classic,
            size: pack.size(),
            puzzle: Some(PuzzleRef::new(pack, index)),
        };
        leaderboard.record(BucketKey::Puzzle { pack, index }, record);
    }

    #[test]
    fn only_beginner_starts_unlocked() {
        let progress = derive_progress(&Leaderboard::new());
        assert!(progress[&Pack::Beginner].unlocked);
        assert!(!progress[&Pack::Intermediate].unlocked);
        assert!(!progress[&Pack::Advanced].unlocked);
    }

    #[test]
    fn pack_completes_with_its_last_puzzle() {
        let mut leaderboard = Leaderboard::new();
        let last = Pack::Intermediate.puzzles().len() - 1;
        for index in 0..last {
            finish(&mut leaderboard, Pack::Intermediate, index);
        }
        assert!(!is_pack_completed(&leaderboard, Pack::Intermediate));

        finish(&mut leaderboard, Pack::Intermediate, last);
        assert!(is_pack_completed(&leaderboard, Pack::Intermediate));
    }

    #[test]
    fn unlocks_follow_pack_order() {
        let mut leaderboard = Leaderboard::new();
        for index in 0..Pack::Beginner.puzzles().len() {
            finish(&mut leaderboard, Pack::Beginner, index);
        }

        let progress = derive_progress(&leaderboard);
        assert!(progress[&Pack::Intermediate].unlocked);
        assert!(!progress[&Pack::Advanced].unlocked);
        assert_eq!(progress[&Pack::Beginner].completed_indices.len(), 5);
    }
}
