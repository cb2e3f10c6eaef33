use wordle_core::{GuessFeedback, Session, WordValidator};
use wordle_types::{GameOutcome, LetterState};

/// Creates a test WordValidator with a known set of words
pub fn create_test_validator() -> WordValidator {
    let word_list = "crane\nslate\ntrace\nirate\nhello\nworld\nhouse\nmouse\ntrain\nplane\nwater\nstone\nbread\ncream\nspeed\nerase\nabbey\nkebab";
    WordValidator::from_word_list(word_list)
}

/// Creates a session against a specific target word
pub fn create_session(target: &str) -> Session {
    Session::new(target).expect("test target should be a valid word")
}

/// Plays every guess in order, panicking on the first rejection
pub fn play_guesses(session: &mut Session, guesses: &[&str]) -> Vec<GuessFeedback> {
    let validator = create_test_validator();
    guesses
        .iter()
        .map(|guess| {
            session
                .submit_guess(guess, &validator)
                .unwrap_or_else(|e| panic!("guess {guess:?} rejected: {e}"))
        })
        .collect()
}

/// Plays six wrong guesses so the session ends lost
pub fn lose_session(session: &mut Session) {
    let wrong = ["house", "mouse", "water", "stone", "bread", "cream"];
    play_guesses(session, &wrong);
    assert_eq!(session.outcome(), GameOutcome::Lost);
}

/// Letter states of the most recent guess
pub fn last_states(session: &Session) -> Vec<LetterState> {
    session
        .results()
        .last()
        .map(|result| result.states())
        .unwrap_or_default()
}
