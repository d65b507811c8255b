//! Runtime settings, read from `QUIZ_*` environment variables (or a `.env` file) with
//! built-in defaults.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use log::LevelFilter;

pub const DEFAULT_COUNTRIES_URL: &str = "https://restcountries.com/v3.1/all?fields=name,capital,region,subregion,population,flag,cca2,cca3,latlng";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub countries_url: String,
    pub fetch_timeout: Duration,
    pub total_questions: u32,
    pub seconds_per_question: u32,
    pub tick_interval: Duration,
    pub feedback_pause: Duration,
    pub token_ttl: chrono::Duration,
    pub signing_key: String,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            fetch_timeout: Duration::from_secs(10),
            total_questions: 10,
            seconds_per_question: 30,
            tick_interval: Duration::from_secs(1),
            feedback_pause: Duration::from_millis(2000),
            token_ttl: chrono::Duration::hours(24),
            signing_key: "capital-quiz-local".to_string(),
            database_path: PathBuf::from("quiz.db"),
            log_dir: PathBuf::from("log"),
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Reads the `QUIZ_*` variables. Outside tests a `.env` file in the working directory
    /// is loaded first; variables already set win over it.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        let defaults = Self::default();

        let total_questions = parse_var("QUIZ_TOTAL_QUESTIONS", defaults.total_questions)?;
        if total_questions == 0 {
            return Err(ConfigError::InvalidValue(
                "QUIZ_TOTAL_QUESTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let seconds_per_question =
            parse_var("QUIZ_SECONDS_PER_QUESTION", defaults.seconds_per_question)?;
        if seconds_per_question == 0 {
            return Err(ConfigError::InvalidValue(
                "QUIZ_SECONDS_PER_QUESTION".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let fetch_timeout = Duration::from_secs(parse_var("QUIZ_FETCH_TIMEOUT_SECS", 10u64)?);
        let feedback_pause = Duration::from_millis(parse_var("QUIZ_FEEDBACK_PAUSE_MS", 2000u64)?);
        let token_ttl = chrono::Duration::hours(parse_var("QUIZ_TOKEN_TTL_HOURS", 24i64)?);

        Ok(Self {
            countries_url: env::var("QUIZ_COUNTRIES_URL").unwrap_or(defaults.countries_url),
            fetch_timeout,
            total_questions,
            seconds_per_question,
            tick_interval: defaults.tick_interval,
            feedback_pause,
            token_ttl,
            signing_key: env::var("QUIZ_SIGNING_KEY").unwrap_or(defaults.signing_key),
            database_path: env::var("QUIZ_DATABASE")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            log_dir: env::var("QUIZ_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: parse_var("QUIZ_LOG_LEVEL", defaults.log_level)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(name.to_string(), format!("'{}' could not be parsed", raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_game_rules() {
        let config = AppConfig::default();
        assert_eq!(config.total_questions, 10);
        assert_eq!(config.seconds_per_question, 30);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.feedback_pause, Duration::from_secs(2));
        assert_eq!(config.token_ttl, chrono::Duration::hours(24));
    }

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let value: u32 = parse_var("QUIZ_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }
}
