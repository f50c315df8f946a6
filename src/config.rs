use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PHRASE_CHANGE_MS: u64 = 1200;
const DEFAULT_REVEAL_DELAY_MS: u64 = 6500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingRequired(&'static str),

    #[error("{name} must be a positive number of milliseconds, got '{value}'")]
    InvalidDuration { name: &'static str, value: String },

    #[error("phrase interval ({phrase_change_ms} ms) is longer than the reveal delay ({reveal_delay_ms} ms)")]
    PhraseSlowerThanReveal {
        phrase_change_ms: u64,
        reveal_delay_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Content JSON to load instead of the embedded one
    pub content_path: Option<PathBuf>,
    /// Link appended to the shared result text
    pub share_url: Option<String>,
    pub phrase_change: Duration,
    pub reveal_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Bot::from_env panics without it, so check it here and fail with a proper error
        if lookup("TELOXIDE_TOKEN").filter(|t| !t.is_empty()).is_none() {
            return Err(ConfigError::MissingRequired("TELOXIDE_TOKEN"));
        }

        let phrase_change_ms = millis(
            &lookup,
            "SORTING_HAT_PHRASE_CHANGE_MS",
            DEFAULT_PHRASE_CHANGE_MS,
        )?;
        let reveal_delay_ms = millis(&lookup, "SORTING_HAT_REVEAL_DELAY_MS", DEFAULT_REVEAL_DELAY_MS)?;
        if phrase_change_ms > reveal_delay_ms {
            return Err(ConfigError::PhraseSlowerThanReveal {
                phrase_change_ms,
                reveal_delay_ms,
            });
        }

        Ok(Self {
            content_path: lookup("SORTING_HAT_CONTENT")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            share_url: lookup("SORTING_HAT_SHARE_URL").filter(|u| !u.is_empty()),
            phrase_change: Duration::from_millis(phrase_change_ms),
            reveal_delay: Duration::from_millis(reveal_delay_ms),
        })
    }
}

fn millis<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(ms),
            _ => Err(ConfigError::InvalidDuration { name, value }),
        },
    }
}
