use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const API_BASE_PATH: &str = "api/";

pub const ENV_API_BASE: &str = "DRIVE_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "DRIVE_TIMEOUT_SECS";

// ============================================================================
// Client Config
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Server origin; requests go to `<api_base>/api/...`.
    pub api_base: String,
    /// No timeout unless set; the transport default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Where `download` writes files when no target is given.
    pub download_dir: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: None,
            download_dir: dirs::download_dir()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        }
    }
}

pub fn config_dir() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "drive", "client")?;
    Some(proj.config_dir().to_path_buf())
}

impl ClientConfig {
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn session_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("session.json"))
    }

    /// Stored settings, then environment overrides. Missing or broken files
    /// fall back to defaults.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("설정 파일 해석 실패 {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(base) = var(ENV_API_BASE).filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        if let Some(secs) = var(ENV_TIMEOUT_SECS).and_then(|s| s.trim().parse().ok()) {
            self.timeout_secs = Some(secs);
        }
    }

    pub fn save(&self) -> Result<(), ApiError> {
        let path = Self::config_path()
            .ok_or_else(|| ApiError::Storage("no config directory on this platform".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ApiError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// `<api_base>/api/`, the root every request path is joined onto.
    pub fn api_root(&self) -> Result<url::Url, ApiError> {
        // trailing slash keeps any path prefix of the base through the join
        let base = url::Url::parse(&format!("{}/", self.api_base.trim_end_matches('/')))?;
        Ok(base.join(API_BASE_PATH)?)
    }
}
