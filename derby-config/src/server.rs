//! Static file server parameters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    #[validate(custom(function = validation::validate_bind_addr))]
    pub bind: String,

    /// Directory served at `/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_bind() -> String {
    "0.0.0.0:8888".into()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            root: default_root(),
        }
    }
}
