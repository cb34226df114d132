use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as TokioMutex;

pub const DEFAULT_LEFT_PANE_WIDTH: u32 = 320;
pub const MIN_LEFT_PANE_WIDTH: u32 = 109;
pub const MAX_LEFT_PANE_WIDTH: u32 = 1000;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "chatdeck=info";

const SETTINGS_FILE: &str = "settings.json";
const PROFILE_DIR_ENV: &str = "CHATDECK_PROFILE_DIR";

/// User preferences shared by the tabs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    // Two letter region used to read phone numbers without a country code.
    pub region_code: Option<String>,
    pub locale: String,
    pub nav_tabs_collapsed: bool,
    pub preferred_left_pane_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region_code: None,
            locale: "en".to_string(),
            nav_tabs_collapsed: false,
            preferred_left_pane_width: DEFAULT_LEFT_PANE_WIDTH,
        }
    }
}

/// Settings persisted as JSON in `settings.json` inside the profile
/// directory. Every setter writes the file before returning.
pub struct ConfigManager {
    path: PathBuf,
    settings: TokioMutex<Settings>,
}

impl ConfigManager {
    /// Loads settings from `dir`, falling back to defaults when the file does
    /// not exist yet.
    pub async fn open(dir: &Path) -> Result<Self, anyhow::Error> {
        let path = dir.join(SETTINGS_FILE);
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(data) => serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse settings {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Settings not found, using defaults");
                Settings::default()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read settings {}", path.display()));
            }
        };
        Ok(Self {
            path,
            settings: TokioMutex::new(settings),
        })
    }

    /// Profile directory from `CHATDECK_PROFILE_DIR` or the platform config
    /// directory.
    pub fn default_dir() -> Result<PathBuf, anyhow::Error> {
        if let Ok(custom_dir) = std::env::var(PROFILE_DIR_ENV) {
            let path = PathBuf::from(custom_dir);
            if path.is_absolute() {
                return Ok(path);
            }
            tracing::warn!("{PROFILE_DIR_ENV} is not an absolute path, using default");
        }
        let base_dir = dirs::config_dir()
            .or_else(dirs::data_dir)
            .context("Failed to determine config directory")?;
        Ok(base_dir.join("chatdeck"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn settings(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    pub async fn set_region_code(&self, region_code: Option<String>) -> Result<(), anyhow::Error> {
        if let Some(code) = &region_code {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Invalid region code '{}'", code));
            }
        }
        let region_code = region_code.map(|code| code.to_ascii_uppercase());
        self.modify(|settings| settings.region_code = region_code).await
    }

    pub async fn set_locale(&self, locale: String) -> Result<(), anyhow::Error> {
        if locale.trim().is_empty() {
            return Err(anyhow!("Locale must not be empty"));
        }
        self.modify(|settings| settings.locale = locale).await
    }

    /// Flips the collapsed state of the navigation tabs and returns the new
    /// value.
    pub async fn toggle_nav_tabs_collapse(&self) -> Result<bool, anyhow::Error> {
        let mut collapsed = false;
        self.modify(|settings| {
            settings.nav_tabs_collapsed = !settings.nav_tabs_collapsed;
            collapsed = settings.nav_tabs_collapsed;
        })
        .await?;
        Ok(collapsed)
    }

    /// Stores the left pane width, clamped to the supported range.
    pub async fn save_preferred_left_pane_width(&self, width: u32) -> Result<u32, anyhow::Error> {
        let width = width.clamp(MIN_LEFT_PANE_WIDTH, MAX_LEFT_PANE_WIDTH);
        self.modify(|settings| settings.preferred_left_pane_width = width)
            .await?;
        Ok(width)
    }

    async fn modify<F>(&self, f: F) -> Result<(), anyhow::Error>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.lock().await;
        let mut updated = settings.clone();
        f(&mut updated);
        self.write(&updated).await?;
        *settings = updated;
        Ok(())
    }

    async fn write(&self, settings: &Settings) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, data)
            .await
            .with_context(|| format!("Failed to write settings {}", self.path.display()))?;
        Ok(())
    }
}
