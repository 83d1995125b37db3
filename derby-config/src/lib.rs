//! # Derby Configuration System
//!
//! Layered configuration for race runs:
//! 1. Default values
//! 2. `config/derby.yaml`
//! 3. `config/<DERBY_ENV>.yaml`
//! 4. `DERBY_*` environment variables (`__` separates nesting levels)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use derby_core::participant::RosterEntry;
use derby_core::style::VisualStyle;

mod error;
mod log;
mod presentation;
mod race;
mod render;
mod server;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use log::LogConfig;
pub use presentation::PresentationConfig;
pub use race::RaceConfig;
pub use render::RenderConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct DerbyConfig {
    /// Tick timing and track geometry.
    #[serde(default)]
    #[validate(nested)]
    pub race: RaceConfig,

    /// Frame rate, erase policy and canvas.
    #[serde(default)]
    #[validate(nested)]
    pub render: RenderConfig,

    /// Ordered entrants. Ties in the result go to the earlier entry.
    #[serde(default = "default_roster")]
    #[validate(custom(function = validation::validate_roster))]
    pub roster: Vec<RosterEntry>,

    #[serde(default)]
    #[validate(nested)]
    pub log: LogConfig,

    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub presentation: PresentationConfig,

    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

fn default_roster() -> Vec<RosterEntry> {
    [
        ("Player 1", "p1", "ship1", 70),
        ("Player 2", "p2", "ship2", 160),
        ("Player 3", "p3", "ship3", 260),
    ]
    .into_iter()
    .map(|(name, key, asset, lane_y)| {
        RosterEntry::new(name, key)
            .with_style(VisualStyle::Sprite {
                asset: asset.into(),
                width: 150,
                height: 150,
            })
            .with_lane(lane_y)
    })
    .collect()
}

impl Default for DerbyConfig {
    fn default() -> Self {
        Self {
            race: RaceConfig::default(),
            render: RenderConfig::default(),
            roster: default_roster(),
            log: LogConfig::default(),
            server: ServerConfig::default(),
            presentation: PresentationConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl DerbyConfig {
    /// Load configuration from default files and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(DerbyConfig::default()));

        if Path::new("config/derby.yaml").exists() {
            figment = figment.merge(Yaml::file("config/derby.yaml"));
        } else {
            debug!("config/derby.yaml not found, using default configuration");
        }

        let env = std::env::var("DERBY_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment.merge(Env::prefixed("DERBY_").split("__")))
    }

    /// Load configuration from a specific file layered over the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Self::finish(
            Figment::from(Serialized::defaults(DerbyConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed("DERBY_").split("__")),
        )
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        config.check_consistency()?;
        Ok(config)
    }

    /// Constraints that span sections.
    pub fn check_consistency(&self) -> Result<(), ConfigError> {
        for entry in &self.roster {
            if entry.style.width() >= self.race.track_width {
                return Err(ConfigError::Inconsistent(format!(
                    "participant '{}' is {}px wide but the track is only {}px",
                    entry.key,
                    entry.style.width(),
                    self.race.track_width
                )));
            }
            if entry.lane_y >= self.render.track_height {
                return Err(ConfigError::Inconsistent(format!(
                    "participant '{}' lane at y={} is below the {}px track",
                    entry.key, entry.lane_y, self.render.track_height
                )));
            }
        }
        Ok(())
    }
}
