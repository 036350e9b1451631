use std::path::PathBuf;
use std::time::Duration;

use gebra_algo::{BktError, BktParams, DEFAULT_GUESS, DEFAULT_LEARN, DEFAULT_SLIP};
use thiserror::Error;

use crate::db::{default_db_path, DbSettings};
use crate::services::pretest::DiagnosticPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db: DbSettings,
    pub bkt: BktParams,
    pub curriculum_path: Option<PathBuf>,
    pub question_bank_path: Option<PathBuf>,
    pub pretest_bank_path: Option<PathBuf>,
    pub diagnostic_policy: DiagnosticPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let db_path = env_path("GEBRA_DB_PATH").unwrap_or_else(default_db_path);
        let mut db = DbSettings::at(db_path);
        db.busy_timeout = Duration::from_millis(env_u64("SQLITE_BUSY_TIMEOUT_MS", 30_000));
        db.max_connections = env_u32("SQLITE_MAX_CONNECTIONS", 5);

        let bkt = BktParams::new(
            env_f64("BKT_GUESS", DEFAULT_GUESS)?,
            env_f64("BKT_SLIP", DEFAULT_SLIP)?,
            env_f64("BKT_LEARN", DEFAULT_LEARN)?,
        )?;

        let diagnostic_policy = match std::env::var("DIAGNOSTIC_POLICY") {
            Ok(value) => DiagnosticPolicy::parse(&value).ok_or(ConfigError::Invalid {
                key: "DIAGNOSTIC_POLICY",
                value,
            })?,
            Err(_) => DiagnosticPolicy::default(),
        };

        Ok(Self {
            log_level,
            db,
            bkt,
            curriculum_path: env_path("CURRICULUM_PATH"),
            question_bank_path: env_path("QUESTION_BANK_PATH"),
            pretest_bank_path: env_path("PRETEST_BANK_PATH"),
            diagnostic_policy,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error(transparent)]
    Bkt(#[from] BktError),
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

fn env_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}
