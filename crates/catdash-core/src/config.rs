use std::{path::Path, time::Duration};

use catdash_api::{Api, ApiError, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    fs::{read_toml_config, read_toml_config_sync, write_toml_config, write_toml_config_sync},
    API_URL_ENV,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub log_level: String,
    pub pixels_per_point: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout_secs: 30,
            log_level: "info".to_owned(),
            pixels_per_point: default_pixels_per_point_value(),
        }
    }
}

// Maybe use somekind library to detect this?
pub fn default_pixels_per_point_value() -> f32 {
    if cfg!(target_os = "macos") {
        2.0
    } else {
        1.2
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults if the file is
    /// missing or malformed.
    ///
    /// Only the file is read. The result is what [`Settings::save`] writes
    /// back, so environment overrides are applied separately with
    /// [`Settings::with_env_overrides`].
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            read_toml_config_sync::<Settings>(path)
                .inspect_err(|e| warn!(error = %e, "Cannot read settings, using defaults"))
                .unwrap_or_default()
        } else {
            info!("No settings at {}, using defaults", path.display());
            Settings::default()
        }
    }

    pub async fn load_async(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            read_toml_config::<Settings>(path)
                .await
                .inspect_err(|e| warn!(error = %e, "Cannot read settings, using defaults"))
                .unwrap_or_default()
        } else {
            Settings::default()
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        write_toml_config_sync(self, path)
    }

    pub async fn save_async(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        write_toml_config(self, path).await
    }

    /// The API URL from `CATDASH_API_URL`, if set and not blank.
    pub fn env_api_url() -> Option<String> {
        std::env::var(API_URL_ENV).ok().filter(|url| !url.trim().is_empty())
    }

    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_api_url_override(Self::env_api_url())
    }

    #[must_use]
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn api(&self) -> Result<Api, ApiError> {
        Api::with_timeout(&self.api_url, self.request_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");
        std::fs::write(&path, "api_url = \"http://localhost:8080\"\n").unwrap();

        let settings = read_toml_config_sync::<Settings>(&path).unwrap();
        assert_eq!("http://localhost:8080", settings.api_url);
        assert_eq!(30, settings.request_timeout_secs);
        assert_eq!("info", settings.log_level);
    }

    #[test]
    fn save_and_load_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs/Settings.toml");

        let settings = Settings {
            request_timeout_secs: 5,
            ..Default::default()
        };
        settings.save(&path).unwrap();

        let read = read_toml_config_sync::<Settings>(&path).unwrap();
        assert_eq!(settings, read);
    }

    #[test]
    fn malformed_file_falls_back_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");
        std::fs::write(&path, "api_url = [").unwrap();

        let settings = Settings::load(&path).with_api_url_override(Some(DEFAULT_API_URL.to_owned()));
        assert_eq!(30, settings.request_timeout_secs);
    }

    #[test]
    fn api_url_override_test() {
        let settings = Settings::default().with_api_url_override(Some("http://other".to_owned()));
        assert_eq!("http://other", settings.api_url);

        let settings = Settings::default().with_api_url_override(Some("  ".to_owned()));
        assert_eq!(DEFAULT_API_URL, settings.api_url);
    }

    #[test]
    fn load_ignores_env_override_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");

        let on_disk = Settings {
            api_url: "http://from-file".to_owned(),
            ..Default::default()
        };
        on_disk.save(&path).unwrap();

        std::env::set_var(API_URL_ENV, "http://from-env");
        let loaded = Settings::load(&path);
        let effective = loaded.clone().with_env_overrides();
        std::env::remove_var(API_URL_ENV);

        assert_eq!(on_disk, loaded);
        assert_eq!("http://from-env", effective.api_url);

        // Saving what was loaded keeps the file value.
        loaded.save(&path).unwrap();
        assert_eq!("http://from-file", Settings::load(&path).api_url);
    }

    #[test]
    fn timeout_is_never_zero_test() {
        let settings = Settings {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(Duration::from_secs(1), settings.request_timeout());
    }
}
