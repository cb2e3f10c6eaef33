use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};
use wordle_types::{
    GameError, GameOutcome, GuessResult, KeyHint, LetterState, MAX_GUESSES, SessionView,
    WORD_LENGTH,
};

use crate::{Dictionary, GuessEvaluator, WordValidator};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Target word must be {expected} ASCII letters, got {word:?}")]
    InvalidTarget { word: String, expected: usize },
}

/// Why a guess was refused. The session is unchanged after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessRejection {
    #[error("Word must be {expected} letters, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Word must only contain letters: {0}")]
    InvalidCharacters(String),
    #[error("Not in word list: {0}")]
    NotInWordList(String),
    #[error("Game is already over ({0:?})")]
    GameFinished(GameOutcome),
}

impl From<GuessRejection> for GameError {
    fn from(rejection: GuessRejection) -> Self {
        match rejection {
            GuessRejection::WrongLength { expected, actual } => GameError::WrongLength {
                expected: expected as u8,
                actual: actual.min(u8::MAX as usize) as u8,
            },
            GuessRejection::InvalidCharacters(word) => GameError::InvalidCharacters { word },
            GuessRejection::NotInWordList(word) => GameError::NotInWordList { word },
            GuessRejection::GameFinished(_) => GameError::GameAlreadyFinished,
        }
    }
}

/// Terminal result of a session, handed to the statistics store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    pub results: Vec<GuessResult>,
}

impl GameSummary {
    pub fn is_win(&self) -> bool {
        matches!(self.outcome, GameOutcome::Won { .. })
    }

    pub fn guess_count(&self) -> usize {
        self.results.len()
    }
}

#[derive(Debug, Clone)]
pub struct GuessFeedback {
    pub result: GuessResult,
    pub outcome: GameOutcome,
    /// Set only on the guess that ended the game.
    pub completed: Option<GameSummary>,
}

#[derive(Debug, Clone)]
pub struct Session {
    target_word: String, // Hidden from clients until the game is lost
    guesses: Vec<String>,
    results: Vec<GuessResult>,
    outcome: GameOutcome,
    letter_states: BTreeMap<char, LetterState>,
}

impl Session {
    pub fn new(target_word: &str) -> Result<Self, SessionError> {
        let target_word = target_word.trim().to_lowercase();
        if target_word.chars().count() != WORD_LENGTH || !WordValidator::is_alphabetic(&target_word)
        {
            return Err(SessionError::InvalidTarget {
                word: target_word,
                expected: WORD_LENGTH,
            });
        }

        debug!("Creating new game session");
        Ok(Self {
            target_word,
            guesses: Vec::new(),
            results: Vec::new(),
            outcome: GameOutcome::Playing,
            letter_states: BTreeMap::new(),
        })
    }

    pub fn submit_guess(
        &mut self,
        guess: &str,
        dictionary: &dyn Dictionary,
    ) -> Result<GuessFeedback, GuessRejection> {
        if self.outcome != GameOutcome::Playing {
            return Err(GuessRejection::GameFinished(self.outcome));
        }

        let guess = guess.trim().to_lowercase();
        let length = guess.chars().count();
        if length != WORD_LENGTH {
            debug!(guess = %guess, length, "Invalid guess length");
            return Err(GuessRejection::WrongLength {
                expected: WORD_LENGTH,
                actual: length,
            });
        }

        if !WordValidator::is_alphabetic(&guess) {
            return Err(GuessRejection::InvalidCharacters(guess));
        }

        // The daily answer may be missing from the accepted list.
        if guess != self.target_word && !dictionary.contains(&guess) {
            debug!(guess = %guess, "Invalid word attempted");
            return Err(GuessRejection::NotInWordList(guess));
        }

        let result = GuessEvaluator::evaluate(&self.target_word, &guess);
        self.merge_letter_states(&result);
        self.guesses.push(guess.clone());
        self.results.push(result.clone());

        info!(attempt = self.guesses.len(), "Valid guess submitted");

        if guess == self.target_word {
            let guesses = self.guesses.len() as u8;
            info!(attempts = guesses, "Game won");
            self.outcome = GameOutcome::Won { guesses };
        } else if self.guesses.len() >= MAX_GUESSES {
            info!(attempts = self.guesses.len(), "Game lost");
            self.outcome = GameOutcome::Lost;
        }

        Ok(GuessFeedback {
            result,
            outcome: self.outcome,
            completed: self.summary(),
        })
    }

    /// Leave an unfinished game. Finished games keep their outcome.
    pub fn abandon(&mut self) {
        if self.outcome == GameOutcome::Playing {
            debug!(attempts = self.guesses.len(), "Game abandoned");
            self.outcome = GameOutcome::Abandoned;
        }
    }

    /// Keep the best state ever seen for each letter.
    fn merge_letter_states(&mut self, result: &GuessResult) {
        for letter_result in &result.letters {
            let known = self.letter_states.get(&letter_result.letter).copied();
            let improves = match known {
                Some(existing) => letter_result.state.is_better_than(existing),
                None => true,
            };

            if improves {
                self.letter_states
                    .insert(letter_result.letter, letter_result.state);
            }
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    pub fn results(&self) -> &[GuessResult] {
        &self.results
    }

    pub fn letter_states(&self) -> &BTreeMap<char, LetterState> {
        &self.letter_states
    }

    pub fn guesses_remaining(&self) -> usize {
        MAX_GUESSES - self.guesses.len()
    }

    pub fn summary(&self) -> Option<GameSummary> {
        if !self.outcome.is_terminal() {
            return None;
        }

        Some(GameSummary {
            outcome: self.outcome,
            results: self.results.clone(),
        })
    }

    pub fn view(&self) -> SessionView {
        let guess_number = if self.outcome == GameOutcome::Playing {
            self.guesses.len() + 1
        } else {
            self.guesses.len()
        };

        SessionView {
            guesses: self.results.clone(),
            keyboard: self
                .letter_states
                .iter()
                .map(|(&letter, &state)| KeyHint { letter, state })
                .collect(),
            outcome: self.outcome,
            guess_number: guess_number as u8,
            max_guesses: MAX_GUESSES as u8,
            word_length: WORD_LENGTH as u8,
            solution: (self.outcome == GameOutcome::Lost).then(|| self.target_word.clone()),
        }
    }
}
