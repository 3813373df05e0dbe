use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_DIR: &str = ".taskchat";
const API_URL_ENV: &str = "TASKCHAT_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_TOKEN_KEY: &str = "authToken";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub chat_path: String,
    pub token_key: String,
    #[serde(skip)]
    pub settings_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            settings_dir: Self::settings_dir_path(),
        }
    }
}

impl Config {
    /// Loads `settings.json` from the user's settings directory, applying the
    /// `TASKCHAT_API_URL` override afterwards.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::settings_dir_path());
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            log::info!("Using {} override: {}", API_URL_ENV, api_url);
            config.api_base_url = api_url;
        }
        config.validated()
    }

    pub fn load_from(settings_dir: &Path) -> Self {
        let settings_file = settings_dir.join(SETTINGS_FILE);
        let defaults = Self {
            settings_dir: settings_dir.to_path_buf(),
            ..Self::default()
        };

        if !settings_file.exists() {
            if let Err(err) = defaults.save() {
                log::error!("Failed to write default settings: {:#}", err);
            }
            return defaults;
        }

        match Self::read_settings(&settings_file) {
            Ok(mut config) => {
                config.settings_dir = settings_dir.to_path_buf();
                config
            }
            Err(err) => {
                log::error!(
                    "Failed to read {}, using defaults: {:#}",
                    settings_file.display(),
                    err
                );
                defaults
            }
        }
    }

    fn read_settings(settings_file: &Path) -> anyhow::Result<Self> {
        let settings_json = std::fs::read_to_string(settings_file)?;
        let config = serde_json::from_str::<Self>(&settings_json)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.settings_dir)?;
        let settings_json = serde_json::to_string_pretty(self)?;
        std::fs::write(self.settings_dir.join(SETTINGS_FILE), settings_json)?;
        Ok(())
    }

    /// Falls back to the default base URL when the configured one does not parse.
    pub fn validated(mut self) -> Self {
        if let Err(err) = url::Url::parse(&self.api_base_url) {
            log::warn!(
                "Invalid api_base_url {:?} ({}), falling back to {}",
                self.api_base_url,
                err,
                DEFAULT_API_BASE_URL
            );
            self.api_base_url = DEFAULT_API_BASE_URL.to_string();
        }
        self
    }

    pub fn chat_endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.chat_path.trim_start_matches('/')
        )
    }

    fn settings_dir_path() -> PathBuf {
        home::home_dir()
            .map(|path| path.join(SETTINGS_DIR))
            .unwrap_or_else(|| SETTINGS_DIR.into())
    }
}
