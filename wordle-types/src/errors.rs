use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rejections reported to the client. None of these end the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    WrongLength { expected: u8, actual: u8 },
    InvalidCharacters { word: String },
    NotInWordList { word: String },
    GameAlreadyFinished,
    NoActiveGame,
    NoDeletionPending,
    WordUnavailable,
    StorageUnavailable,
    RateLimitExceeded,
    AuthenticationRequired,
    AlreadyAuthenticated,
    InvalidMessage { message: String },
}
