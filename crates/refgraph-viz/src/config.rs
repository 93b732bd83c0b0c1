//! Viewer configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use refgraph_core::{ExtractorConfig, SceneDocument, SceneError};
use refgraph_overlay::OverlayStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable that overrides [`ViewerConfig::scene_path`].
pub const SCENE_ENV: &str = "REFGRAPH_SCENE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scene document: {0}")]
    Scene(#[from] SceneError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration for the viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub extractor: ExtractorConfig,
    pub overlay: OverlayStyle,
    /// Scene document to open instead of the built-in sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_path: Option<PathBuf>,
}

impl ViewerConfig {
    /// Load configuration from disk with environment overrides.
    pub fn load() -> ConfigResult<Self> {
        let config = match Self::config_file_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        Ok(config.with_scene_override(std::env::var_os(SCENE_ENV)))
    }

    /// Load configuration from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = read(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "refgraph", "refgraph")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Replace the scene path with `value` when it is set and non-empty.
    pub fn with_scene_override(self, value: Option<OsString>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(path) => Self {
                scene_path: Some(PathBuf::from(path)),
                ..self
            },
            None => self,
        }
    }

    /// Read the configured scene document, if any.
    pub fn load_scene(&self) -> ConfigResult<Option<SceneDocument>> {
        let Some(path) = &self.scene_path else {
            return Ok(None);
        };
        let json = read(path)?;
        Ok(Some(SceneDocument::from_json(&json)?))
    }
}

fn read(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
