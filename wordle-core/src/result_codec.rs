//! Compact encoding of a finished game, stored alongside the player's stats
//! so an "already played" screen can redraw the board.
//!
//! Format: `{"w":<won>,"g":["c?r?a?n?e?", ...]}` where every guess is five
//! letter/state pairs and the state is one of `c` (correct), `p` (present)
//! or `a` (absent).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wordle_types::{GuessResult, LetterResult, LetterState, StoredResult, WORD_LENGTH};

use crate::GameSummary;

#[derive(Debug, Error)]
pub enum ResultFormatError {
    #[error("Malformed stored result: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed guess entry {0:?}")]
    Guess(String),
}

#[derive(Serialize, Deserialize)]
struct CompactResult {
    w: bool,
    g: Vec<String>,
}

impl GameSummary {
    pub fn to_compact(&self) -> Result<String, ResultFormatError> {
        let compact = CompactResult {
            w: self.is_win(),
            g: self.results.iter().map(encode_guess).collect(),
        };

        Ok(serde_json::to_string(&compact)?)
    }
}

fn encode_guess(result: &GuessResult) -> String {
    result
        .letters
        .iter()
        .flat_map(|l| [l.letter, l.state.code()])
        .collect()
}

fn decode_guess(entry: &str) -> Result<GuessResult, ResultFormatError> {
    let chars: Vec<char> = entry.chars().collect();
    if chars.len() != WORD_LENGTH * 2 {
        return Err(ResultFormatError::Guess(entry.to_string()));
    }

    let letters = chars
        .chunks(2)
        .map(|pair| {
            let state = LetterState::from_code(pair[1])
                .ok_or_else(|| ResultFormatError::Guess(entry.to_string()))?;
            Ok(LetterResult {
                letter: pair[0],
                state,
            })
        })
        .collect::<Result<Vec<_>, ResultFormatError>>()?;

    Ok(GuessResult {
        word: letters.iter().map(|l| l.letter).collect(),
        letters,
    })
}

/// Decode a stored result. An empty string means nothing was stored.
pub fn parse_stored_result(compact: &str) -> Result<Option<StoredResult>, ResultFormatError> {
    if compact.trim().is_empty() {
        return Ok(None);
    }

    let parsed: CompactResult = serde_json::from_str(compact)?;
    let guesses = parsed
        .g
        .iter()
        .map(|entry| decode_guess(entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(StoredResult {
        won: parsed.w,
        guesses,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Session, WordValidator};
    use wordle_types::GameOutcome;

    fn finished_session() -> Session {
        let validator = WordValidator::from_word_list("slate\ncrane");
        let mut session = Session::new("crane").unwrap();
        session.submit_guess("slate", &validator).unwrap();
        session.submit_guess("crane", &validator).unwrap();
        session
    }

    #[test]
    fn test_encodes_compact_format() {
        let summary = finished_session().summary().unwrap();
        let compact = summary.to_compact().unwrap();

        // slate: s, l, t absent; a, e correct. crane: all correct.
        assert_eq!(compact, r#"{"w":true,"g":["salaactaec","ccrcacncec"]}"#);
    }

    #[test]
    fn test_decodes_stored_board() {
        let summary = finished_session().summary().unwrap();
        let compact = summary.to_compact().unwrap();

        let stored = parse_stored_result(&compact).unwrap().unwrap();
        assert!(stored.won);
        assert_eq!(stored.guesses, summary.results);
        assert_eq!(stored.guesses[0].word, "slate");
    }

    #[test]
    fn test_loss_flag() {
        let summary = GameSummary {
            outcome: GameOutcome::Lost,
            results: Vec::new(),
        };
        assert_eq!(summary.to_compact().unwrap(), r#"{"w":false,"g":[]}"#);
    }

    #[test]
    fn test_empty_string_is_no_result() {
        assert!(parse_stored_result("").unwrap().is_none());
        assert!(parse_stored_result("   ").unwrap().is_none());
    }

    #[test]
    fn test_malformed_entries_are_errors() {
        assert!(matches!(
            parse_stored_result("not json"),
            Err(ResultFormatError::Json(_))
        ));
        assert!(matches!(
            parse_stored_result(r#"{"w":true,"g":["cc"]}"#),
            Err(ResultFormatError::Guess(_))
        ));
        assert!(matches!(
            parse_stored_result(r#"{"w":true,"g":["cxrcacncec"]}"#),
            Err(ResultFormatError::Guess(_))
        ));
    }
}
