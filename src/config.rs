//! Analysis options and runtime configuration.
//!
//! Options are plain serde structs so they can travel inside HTTP payloads or
//! live next to a project snapshot as a JSON file. Server settings come from
//! the environment.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const HTTP_ADDR_ENV: &str = "CRITICAL_PATH_HTTP_ADDR";
pub const SEED_ENV: &str = "CRITICAL_PATH_SEED";
pub const LOG_ENV: &str = "CRITICAL_PATH_LOG";
/// Path to a JSON file holding [`AnalysisOptions`].
pub const OPTIONS_ENV: &str = "CRITICAL_PATH_OPTIONS";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid bind address '{0}'")]
    InvalidAddr(String),
}

/// What to do with a task whose end date precedes its start date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePolicy {
    /// Refuse the whole task list.
    #[default]
    Reject,
    /// Let the zero or negative duration flow through both passes.
    Allow,
}

impl DateRangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangePolicy::Reject => "reject",
            DateRangePolicy::Allow => "allow",
        }
    }
}

impl FromStr for DateRangePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DateRangePolicy::Reject),
            "allow" => Ok(DateRangePolicy::Allow),
            other => Err(format!(
                "invalid date range policy: {other} (expected \"reject\" or \"allow\")"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub date_range_policy: DateRangePolicy,
}

impl AnalysisOptions {
    pub fn allowing_inverted_ranges() -> Self {
        Self {
            date_range_policy: DateRangePolicy::Allow,
        }
    }
}

pub fn load_options_from_json<P: AsRef<Path>>(path: P) -> Result<AnalysisOptions, ConfigError> {
    let file = File::open(path)?;
    let options = serde_json::from_reader(file)?;
    Ok(options)
}

pub fn save_options_to_json<P: AsRef<Path>>(
    options: &AnalysisOptions,
    path: P,
) -> Result<(), ConfigError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, options)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Project snapshot loaded into the registry at startup.
    pub seed: Option<PathBuf>,
    pub log_level: Option<String>,
    pub options: AnalysisOptions,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests do not have to
    /// touch process-wide environment variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(HTTP_ADDR_ENV).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr(raw_addr.clone()))?;
        let seed = lookup(SEED_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let log_level = lookup(LOG_ENV).filter(|s| !s.trim().is_empty());
        let options = options_from_lookup(&lookup)?;
        Ok(Self {
            addr,
            seed,
            log_level,
            options,
        })
    }
}

/// Options from the file named by `CRITICAL_PATH_OPTIONS`, or the defaults
/// when the key is unset.
pub fn options_from_lookup<F>(lookup: F) -> Result<AnalysisOptions, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(OPTIONS_ENV).filter(|s| !s.trim().is_empty()) {
        Some(path) => load_options_from_json(path.trim()),
        None => Ok(AnalysisOptions::default()),
    }
}
