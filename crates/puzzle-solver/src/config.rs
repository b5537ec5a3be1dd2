//! Solver configuration.
//!
//! Built from CLI flags, or loaded from a TOML file:
//!
//! ```
//! use puzzle_solver::{DuplicatePolicy, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     time_limit_secs = 10
//!     duplicate_policy = "first_seen"
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstSeen);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Wall-clock ceiling applied when nothing else is configured.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// How often (in iterations) the solver logs progress at debug level.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

/// What to do when a successor's signature has already been enqueued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Enqueue each signature at most once, even if a shorter path to it
    /// turns up later.
    FirstSeen,

    /// Re-enqueue a state whenever a strictly shorter path reaches it.
    /// Superseded frontier entries are discarded when popped.
    #[default]
    Reopen,
}

/// Configuration for the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Give up (inconclusively) once elapsed time reaches this many seconds.
    /// Checked at the end of each iteration with `elapsed >= limit`, so `Some(0)`
    /// stops after exactly one iteration. `None` disables the ceiling.
    pub time_limit_secs: Option<u64>,
    /// Give up (inconclusively) after this many main-lane expansions. The twin
    /// lane expands in lockstep, so its count is the same.
    pub max_expansions: Option<usize>,
    pub duplicate_policy: DuplicatePolicy,
    /// Iterations between progress log lines
    pub progress_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: Some(DEFAULT_TIME_LIMIT_SECS),
            max_expansions: None,
            duplicate_policy: DuplicatePolicy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl SolverConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_time_limit_secs(mut self, secs: Option<u64>) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_max_expansions(mut self, limit: Option<usize>) -> Self {
        self.max_expansions = limit;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Returns the wall-clock ceiling, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}
