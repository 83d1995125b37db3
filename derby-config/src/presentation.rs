//! Result presentation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

const EASTER_EGG_URL: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1";

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct PresentationConfig {
    /// Video shown alongside the winner. `None` disables it.
    #[serde(default = "default_easter_egg_url")]
    #[validate(custom(function = validation::validate_http_url))]
    pub easter_egg_url: Option<String>,
}

fn default_easter_egg_url() -> Option<String> {
    Some(EASTER_EGG_URL.into())
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            easter_egg_url: default_easter_egg_url(),
        }
    }
}
