//! Configuration loaded from `~/.session-draft/config.toml`.
//!
//! ```toml
//! [api]
//! base_url = "https://practice.example.com"
//! timeout_secs = 30
//! assessment_route = "note-performance"   # or "session-performance-assessments"
//!
//! [products]
//! inactive_plan = "show-none"             # or "show-all"
//!
//! [session]
//! default_duration_minutes = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::AssessmentRoute;
use crate::draft::{InactivePlanPolicy, DEFAULT_DURATION_MINUTES};

const CONFIG_DIR: &str = ".session-draft";
const CONFIG_FILE: &str = "config.toml";

/// Overrides `[api] base_url` when set.
pub const API_URL_ENV: &str = "SESSION_DRAFT_API_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub products: ProductConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bound on every API call, including each submission step.
    pub timeout_secs: u64,
    pub assessment_route: AssessmentRoute,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            assessment_route: AssessmentRoute::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    pub inactive_plan: InactivePlanPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub default_duration_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl AppConfig {
    /// `~/.session-draft/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is read
    /// if present and defaults are used otherwise. The environment override
    /// is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::read(p)?,
            None => {
                let default = Self::default_path()?;
                if default.exists() {
                    Self::read(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(std::env::var(API_URL_ENV).ok());
        config.check()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_overrides(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    fn check(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            bail!("[api] timeout_secs must be at least 1");
        }
        if self.session.default_duration_minutes == 0 {
            bail!("[session] default_duration_minutes must be at least 1");
        }
        Ok(())
    }

    pub const fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
