use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_DB: &str = "quizzes.json";
const DEFAULT_AUTHORS: &str = "Quiz CLI authors";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// `None` leaves the decision to terminal detection.
    pub color: Option<bool>,
    pub authors: Vec<String>,
}

impl Config {
    /// Reads settings from the process environment. Call after `dotenv()`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("QUIZ_DB")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB.to_string())
            .into();

        let color = match lookup("QUIZ_COLOR") {
            Some(value) => Some(parse_flag("QUIZ_COLOR", &value)?),
            None => None,
        };

        let authors = lookup("QUIZ_AUTHORS")
            .unwrap_or_else(|| DEFAULT_AUTHORS.to_string())
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Ok(Self {
            db_path,
            color,
            authors,
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
