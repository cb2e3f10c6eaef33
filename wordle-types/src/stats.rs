use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::MAX_GUESSES;

/// Placeholder used when a connection presents no name or no credential.
pub const ANONYMOUS: &str = "anonymous";

/// A player is the pair of display name and credential fingerprint; the same
/// name with a different key is a different player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    pub display_name: String,
    pub fingerprint: String,
}

impl Identity {
    pub fn new(display_name: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerStats {
    pub display_name: String,
    pub fingerprint: String,
    pub games_played: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub current_streak: i32,
    pub max_streak: i32,
    pub guess_distribution: [i32; MAX_GUESSES], // Index 0 = won in 1 guess
    pub total_guesses: i32,
    pub last_played: Option<String>, // ISO 8601 string
    pub last_puzzle_date: String,
    pub last_result: String,
}

impl PlayerStats {
    /// Zero-valued record for a player with no completed games.
    pub fn empty(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name.clone(),
            fingerprint: identity.fingerprint.clone(),
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            current_streak: 0,
            max_streak: 0,
            guess_distribution: [0; MAX_GUESSES],
            total_guesses: 0,
            last_played: None,
            last_puzzle_date: String::new(),
            last_result: String::new(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.games_played > 0
    }

    /// Percentage of games won, 0 when nothing has been played.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.games_won) / f64::from(self.games_played) * 100.0
    }

    /// Mean guesses per win, 0 when nothing has been won.
    pub fn average_guesses(&self) -> f64 {
        if self.games_won == 0 {
            return 0.0;
        }
        f64::from(self.total_guesses) / f64::from(self.games_won)
    }
}

/// Public leaderboard row; fingerprints are never exposed here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub display_name: String,
    pub games_played: i32,
    pub games_won: i32,
    pub max_streak: i32,
}
