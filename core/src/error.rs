use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid tile index")]
    InvalidIndex,
    #[error("Board size must be between 4x4 and 6x6")]
    InvalidSize,
    #[error("Puzzle definition is not a valid permutation")]
    InvalidPuzzle,
    #[error("No puzzle at that position in the pack")]
    UnknownPuzzle,
    #[error("Pack is still locked")]
    PackLocked,
    #[error("Round already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Round is not being played")]
    NotPlaying,
    #[error("No such power-up is available")]
    UnknownPowerUp,
    #[error("Another power-up override is already armed")]
    OverridePending,
    #[error("Malformed leaderboard bucket key")]
    InvalidBucketKey,
    #[error("Could not access persisted state")]
    Persistence,
    #[error("No round in progress")]
    NoActiveRound,
}

pub type Result<T> = core::result::Result<T, GameError>;
