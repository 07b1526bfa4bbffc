// Solver configuration loaded from Solver.toml.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::{Strategy, Weights};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "Solver.toml";

/// Which heuristic monomorphization to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicPrecision {
    #[default]
    Full,
    Fast,
}

impl fmt::Display for HeuristicPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeuristicPrecision::Full => f.write_str("full"),
            HeuristicPrecision::Fast => f.write_str("fast"),
        }
    }
}

/// Everything needed to build a [`Solver`](crate::search::Solver).
///
/// Missing keys fall back to [`SolverConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub parallel: bool,
    pub precision: HeuristicPrecision,
    pub weights: Weights,
    pub strategy: Strategy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            precision: HeuristicPrecision::Full,
            weights: Weights::default(),
            strategy: Strategy::default(),
        }
    }
}

impl SolverConfig {
    /// Loads and validates a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: SolverConfig = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads `Solver.toml` if present, otherwise the built-in defaults.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("{DEFAULT_CONFIG_FILE} not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.strategy.validate()
    }
}
