use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::balance::BalanceParams;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON database location (defaults to ~/.config/picadito/picadito.json)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// tracing filter directive, e.g. "info" or "picadito=debug"
    #[serde(default)]
    pub log_level: Option<String>,

    /// Default balancing parameters; CLI flags override them per run
    #[serde(default)]
    pub balance: BalanceParams,
}

impl Config {
    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(crate::store::get_database_path)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
