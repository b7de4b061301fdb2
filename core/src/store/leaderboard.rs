use core::fmt;
use core::str::FromStr;
use hashbrown::HashMap;
use serde::{Deserialize, Deserializer, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::*;

/// Records kept per bucket.
pub const MAX_RECORDS: usize = 5;

/// Partition of the leaderboard a result is ranked in.
///
/// Stored as text, `classic-4x4` for free play and `beginner-2` for puzzles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BucketKey {
    FreePlay { mode: Mode, size: BoardSize },
    Puzzle { pack: Pack, index: usize },
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreePlay { mode, size } => write!(f, "{}-{}", mode, size),
            Self::Puzzle { pack, index } => write!(f, "{}-{}", pack, index),
        }
    }
}

impl FromStr for BucketKey {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (head, tail) = s.split_once('-').ok_or(GameError::InvalidBucketKey)?;
        if let Ok(mode) = head.parse::<Mode>() {
            let size = tail.parse().map_err(|_| GameError::InvalidBucketKey)?;
            return Ok(Self::FreePlay { mode, size });
        }
        let pack = head.parse::<Pack>()?;
        let index = tail.parse().map_err(|_| GameError::InvalidBucketKey)?;
        Ok(Self::Puzzle { pack, index })
    }
}

impl From<BucketKey> for String {
    fn from(key: BucketKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for BucketKey {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub player_label: String,
    pub moves: u32,
    pub time_remaining: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub mode: Mode,
    pub size: BoardSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle: Option<PuzzleRef>,
}

impl ResultRecord {
    /// Result of a finished round, stamped with the current time.
    pub fn from_round(engine: &PlayEngine, player_label: impl Into<String>) -> Self {
        Self {
            player_label: player_label.into(),
            moves: engine.move_count(),
            time_remaining: engine.time_remaining(),
            timestamp: now_millis(),
            mode: engine.mode(),
            size: engine.size(),
            puzzle: engine.puzzle(),
        }
    }
}

fn now_millis() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis().try_into().unwrap_or(u64::MAX),
        Err(_) => {
            log::warn!("System clock is before the Unix epoch");
            0
        }
    }
}

/// Best results per bucket, fewest moves first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard {
    buckets: HashMap<BucketKey, Vec<ResultRecord>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks `record` in its bucket and returns its 0-based rank, or `None`
    /// when it did not make the cut. Ties keep the earlier record ahead.
    pub fn record(&mut self, key: BucketKey, record: ResultRecord) -> Option<usize> {
        let records = self.buckets.entry(key).or_default();
        let rank = records.partition_point(|existing| existing.moves <= record.moves);
        if rank >= MAX_RECORDS {
            return None;
        }
        records.insert(rank, record);
        records.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn records(&self, key: &BucketKey) -> &[ResultRecord] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn best(&self, key: &BucketKey) -> Option<&ResultRecord> {
        self.records(key).first()
    }

    pub fn has_records(&self, key: &BucketKey) -> bool {
        !self.records(key).is_empty()
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &[ResultRecord])> {
        self.buckets
            .iter()
            .map(|(key, records)| (key, records.as_slice()))
    }
}

/// Stored tables are not trusted: buckets with keys this build does not know
/// are dropped, the rest are re-ranked and cut back to [`MAX_RECORDS`].
impl<'de> Deserialize<'de> for Leaderboard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let raw = HashMap::<String, Vec<ResultRecord>>::deserialize(deserializer)?;
        let buckets = raw
            .into_iter()
            .filter_map(|(key, mut records)| match key.parse::<BucketKey>() {
                Ok(bucket) => {
                    records.sort_by_key(|record| record.moves);
                    records.truncate(MAX_RECORDS);
                    Some((bucket, records))
                }
                Err(err) => {
                    log::warn!("Skipping leaderboard bucket {:?}: {}", key, err);
                    None
                }
            })
            .collect();
        Ok(Self { buckets })
    }
}
