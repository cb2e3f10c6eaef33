use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of letters in every puzzle word and every guess.
pub const WORD_LENGTH: usize = 5;
/// Guesses allowed before the game is lost.
pub const MAX_GUESSES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterState {
    Correct, // Green - right letter, right position
    Present, // Yellow - in the word, wrong position
    Absent,  // Gray - not in the word
}

impl LetterState {
    /// Lower rank means more information: Correct < Present < Absent.
    pub fn rank(self) -> u8 {
        match self {
            LetterState::Correct => 0,
            LetterState::Present => 1,
            LetterState::Absent => 2,
        }
    }

    pub fn is_better_than(self, other: LetterState) -> bool {
        self.rank() < other.rank()
    }

    /// Single-character code used by the compact result format.
    pub fn code(self) -> char {
        match self {
            LetterState::Correct => 'c',
            LetterState::Present => 'p',
            LetterState::Absent => 'a',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'c' => Some(LetterState::Correct),
            'p' => Some(LetterState::Present),
            'a' => Some(LetterState::Absent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LetterResult {
    pub letter: char,
    pub state: LetterState,
}

/// Feedback for a single guess, one entry per position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResult {
    pub word: String,
    pub letters: Vec<LetterResult>,
}

impl GuessResult {
    pub fn is_solved(&self) -> bool {
        self.letters.len() == WORD_LENGTH
            && self
                .letters
                .iter()
                .all(|l| l.state == LetterState::Correct)
    }

    pub fn states(&self) -> Vec<LetterState> {
        self.letters.iter().map(|l| l.state).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum GameOutcome {
    Playing,
    Won { guesses: u8 },
    Lost,
    Abandoned, // Left before finishing, never persisted
}

impl GameOutcome {
    /// Won and Lost are terminal; Abandoned is an exit, not a result.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameOutcome::Won { .. } | GameOutcome::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KeyHint {
    pub letter: char,
    pub state: LetterState,
}

/// Everything a renderer needs to draw the board. The solution is only
/// present once the game has been lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionView {
    pub guesses: Vec<GuessResult>,
    pub keyboard: Vec<KeyHint>,
    pub outcome: GameOutcome,
    pub guess_number: u8,
    pub max_guesses: u8,
    pub word_length: u8,
    pub solution: Option<String>,
}

/// A finished game as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoredResult {
    pub won: bool,
    pub guesses: Vec<GuessResult>,
}
