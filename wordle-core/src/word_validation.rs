use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use wordle_types::WORD_LENGTH;

/// Accepted-word list consulted when validating guesses.
pub trait Dictionary: Send + Sync {
    fn contains(&self, word: &str) -> bool;
}

#[derive(Debug)]
pub struct WordValidator {
    valid_words: HashSet<String>,
}

impl WordValidator {
    /// Create a new word validator from a word list
    pub fn from_word_list(word_list: &str) -> Self {
        let valid_words = word_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .filter(|word| Self::is_playable(word))
            .collect();

        Self { valid_words }
    }

    /// Load every `.txt` file in a directory into one validator
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read word directory {}", dir.display()))?;

        let mut combined = String::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read word file {}", path.display()))?;
            combined.push_str(&content);
            combined.push('\n');
        }

        let validator = Self::from_word_list(&combined);
        if validator.word_count() == 0 {
            return Err(anyhow!("No {}-letter words found in {}", WORD_LENGTH, dir.display()));
        }

        tracing::info!(
            words = validator.word_count(),
            directory = %dir.display(),
            "Loaded accepted word list"
        );
        Ok(validator)
    }

    /// Check if a word is valid for the game
    pub fn is_valid_word(&self, word: &str) -> bool {
        let word = word.trim().to_lowercase();
        self.valid_words.contains(&word)
    }

    pub fn word_count(&self) -> usize {
        self.valid_words.len()
    }

    /// Check if word contains only ASCII letters
    pub fn is_alphabetic(word: &str) -> bool {
        word.chars().all(|c| c.is_ascii_alphabetic())
    }

    fn is_playable(word: &str) -> bool {
        word.chars().count() == WORD_LENGTH && Self::is_alphabetic(word)
    }
}

impl Dictionary for WordValidator {
    fn contains(&self, word: &str) -> bool {
        self.is_valid_word(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_validator() {
        let word_list = "apple\nbanana\ncherry\n# comment\n\ntests\nvalid";
        let validator = WordValidator::from_word_list(word_list);

        assert!(validator.is_valid_word("apple"));
        assert!(validator.is_valid_word("APPLE")); // case insensitive
        assert!(validator.is_valid_word("tests"));
        assert!(validator.is_valid_word("valid"));
        assert!(!validator.is_valid_word("banana")); // wrong length
        assert!(!validator.is_valid_word("xyz"));
        assert_eq!(validator.word_count(), 3);
    }

    #[test]
    fn test_alphabetic_check() {
        assert!(WordValidator::is_alphabetic("hello"));
        assert!(!WordValidator::is_alphabetic("hello123"));
        assert!(!WordValidator::is_alphabetic("hel-o"));
        assert!(!WordValidator::is_alphabetic("héllo"));
        assert!(!WordValidator::is_alphabetic(" "));
    }

    #[test]
    fn test_comments_whitespace_and_symbols() {
        let word_list = "# This is a comment\nvalid\n   \n\t# Another comment\n  MIXED  \nab1de\n\n";
        let validator = WordValidator::from_word_list(word_list);

        assert!(validator.is_valid_word("valid"));
        assert!(validator.is_valid_word("mixed"));
        assert!(validator.is_valid_word("  MiXeD "));
        assert!(!validator.is_valid_word("ab1de"));
        assert_eq!(validator.word_count(), 2);
    }

    #[test]
    fn test_empty_word_list() {
        let validator = WordValidator::from_word_list("");
        assert!(!validator.contains("hello"));
        assert_eq!(validator.word_count(), 0);
    }

    #[test]
    fn test_from_directory_reads_only_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("common.txt"), "crane\nslate\n").unwrap();
        std::fs::write(dir.path().join("extra.txt"), "# more\nirate\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "bogus\n").unwrap();

        let validator = WordValidator::from_directory(dir.path()).unwrap();

        assert_eq!(validator.word_count(), 3);
        assert!(validator.contains("irate"));
        assert!(!validator.contains("bogus"));
    }

    #[test]
    fn test_from_directory_without_words_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("short.txt"), "abc\nlonger\n").unwrap();

        let result = WordValidator::from_directory(dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No 5-letter words"));
    }

    #[test]
    fn test_missing_directory_fails() {
        let result = WordValidator::from_directory("/definitely/not/here");
        assert!(result.is_err());
    }
}
