use wordle_types::{GuessResult, LetterResult, LetterState};

pub struct GuessEvaluator;

impl GuessEvaluator {
    /// Colour a guess against the target word.
    ///
    /// Both words must already be validated lowercase words of equal length.
    /// Exact matches are resolved first; the remaining guess letters are then
    /// matched left to right against target positions that have not been
    /// consumed yet, so each target letter satisfies at most one guess letter.
    pub fn evaluate(target: &str, guess: &str) -> GuessResult {
        let target_chars: Vec<char> = target.chars().collect();
        let guess_chars: Vec<char> = guess.chars().collect();
        debug_assert_eq!(target_chars.len(), guess_chars.len());

        let mut states = vec![LetterState::Absent; guess_chars.len()];
        let mut consumed = vec![false; target_chars.len()];

        // First pass: exact positions
        for (i, (&g, &t)) in guess_chars.iter().zip(target_chars.iter()).enumerate() {
            if g == t {
                states[i] = LetterState::Correct;
                consumed[i] = true;
            }
        }

        // Second pass: misplaced letters against unconsumed target positions
        for (i, &g) in guess_chars.iter().enumerate() {
            if states[i] == LetterState::Correct {
                continue;
            }

            let available = target_chars
                .iter()
                .enumerate()
                .position(|(j, &t)| !consumed[j] && t == g);

            if let Some(j) = available {
                states[i] = LetterState::Present;
                consumed[j] = true;
            }
        }

        GuessResult {
            word: guess.to_string(),
            letters: guess_chars
                .into_iter()
                .zip(states)
                .map(|(letter, state)| LetterResult { letter, state })
                .collect(),
        }
    }
}
