//! Engine configuration, layered with figment.
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `board.toml` in the working directory, or an explicit file
//! 3. Environment variables prefixed `BOARD_` (e.g. `BOARD_PERSIST_POLICY=all-changed`)

use crate::error::ConfigError;
use crate::filter::FilterMode;
use crate::moves::PersistPolicy;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "board.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "BOARD_";

/// Engine and driver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Which entities a move sends to the remote store
    pub persist_policy: PersistPolicy,
    /// How name and label filters combine
    pub filter_mode: FilterMode,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Where the outbox adapter queues sync requests
    pub outbox_path: PathBuf,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            persist_policy: PersistPolicy::default(),
            filter_mode: FilterMode::default(),
            log_level: "info".to_string(),
            outbox_path: PathBuf::from("board-outbox.jsonl"),
        }
    }
}

impl BoardConfig {
    /// Load from defaults, `./board.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with an explicit config file in place of `./board.toml`.
    ///
    /// An explicit file must exist; the implicit one is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
        }

        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        debug!(path = %file.display(), "loading board configuration");

        let config: Self = Self::figment(&file).extract()?;
        debug!(?config, "loaded board configuration");
        Ok(config)
    }

    /// The merged provider chain, exposed for callers that add their own layers
    pub fn figment(file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }
}
