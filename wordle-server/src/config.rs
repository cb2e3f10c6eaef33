use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

pub const DEFAULT_WORD_SOURCE_URL: &str = "https://www.nytimes.com/svc/wordle/v2/{date}.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub words_directory: String,
    pub motd: String,
    pub log_level: String,
    pub word_source_url: String,
    pub word_fetch_timeout_seconds: u64,
    pub utc_offset_minutes: i32,
    pub blocked_usernames: Vec<String>,
    pub connection_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let utc_offset_minutes = parse(&lookup, "WORDLE_UTC_OFFSET_MINUTES", 0i32)?;
        if FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(ConfigError::InvalidValue {
                name: "WORDLE_UTC_OFFSET_MINUTES",
                value: utc_offset_minutes.to_string(),
            });
        }

        let blocked_usernames = lookup("WORDLE_BLOCKED_USERNAMES")
            .map(|names| {
                names
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: parse(&lookup, "WORDLE_HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse(&lookup, "WORDLE_PORT", 23234)?,
            database_url: text("DATABASE_URL", "sqlite://wordle-stats.db?mode=rwc"),
            words_directory: text("WORDS_DIRECTORY", "./shared/words"),
            motd: text("WORDLE_MOTD", "Welcome to Wordle!"),
            log_level: text("WORDLE_LOG_LEVEL", "info"),
            word_source_url: text("WORDLE_WORD_SOURCE_URL", DEFAULT_WORD_SOURCE_URL),
            word_fetch_timeout_seconds: parse(&lookup, "WORDLE_WORD_FETCH_TIMEOUT_SECONDS", 10)?,
            utc_offset_minutes,
            blocked_usernames,
            connection_timeout_seconds: parse(&lookup, "CONNECTION_TIMEOUT_SECONDS", 300)?,
        })
    }

    /// Offset that decides when the puzzle day rolls over.
    pub fn puzzle_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    pub fn word_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.word_fetch_timeout_seconds)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_seconds)
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(config.port, 23234);
        assert_eq!(config.database_url, "sqlite://wordle-stats.db?mode=rwc");
        assert_eq!(config.words_directory, "./shared/words");
        assert_eq!(config.word_source_url, DEFAULT_WORD_SOURCE_URL);
        assert_eq!(config.word_fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.puzzle_offset().local_minus_utc(), 0);
        assert!(config.blocked_usernames.is_empty());
        assert_eq!(config.connection_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("WORDLE_HOST", "127.0.0.1"),
            ("WORDLE_PORT", "8080"),
            ("WORDLE_MOTD", "Hi"),
            ("WORDLE_UTC_OFFSET_MINUTES", "-300"),
            ("WORDLE_BLOCKED_USERNAMES", "mallory, eve,,"),
        ])
        .unwrap();

        assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.motd, "Hi");
        assert_eq!(config.puzzle_offset().local_minus_utc(), -300 * 60);
        assert_eq!(config.blocked_usernames, vec!["mallory", "eve"]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = config_from(&[("WORDLE_PORT", "not-a-port")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "WORDLE_PORT",
                value: "not-a-port".to_string()
            }
        );

        assert!(config_from(&[("WORDLE_HOST", "localhost")]).is_err());
        assert!(config_from(&[("WORDLE_UTC_OFFSET_MINUTES", "100000")]).is_err());
    }
}
