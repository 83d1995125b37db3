//! Race log location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// CSV race log. `-` reads standard input.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("racedata.csv")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
