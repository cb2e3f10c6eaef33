use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameError, PlayerStats, SessionView, StoredResult};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    Authenticate {
        username: String,
        public_key: Option<String>,
    },
    StartGame,
    SubmitGuess { word: String },
    ViewStats,
    RequestDataDeletion,
    ConfirmDataDeletion,
    CancelDataDeletion,
    ReturnToMenu,
    Heartbeat,
}

/// What the main menu should offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuView {
    pub motd: String,
    pub puzzle_date: String,
    pub has_played_today: bool,
    pub has_user_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    AuthenticationSuccess {
        display_name: String,
        fingerprint: String,
        menu: MenuView,
    },
    AuthenticationFailed { reason: String },
    Menu { menu: MenuView },
    GameUpdate { view: SessionView },
    AlreadyPlayed {
        puzzle_date: String,
        result: Option<StoredResult>,
    },
    Stats { stats: PlayerStats },
    DeletionPrompt { stats: PlayerStats },
    DataDeleted,
    ResultNotSaved,
    Error { error: GameError },
    Pong,
}
