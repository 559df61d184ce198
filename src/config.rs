use serde::Deserialize;
use serde_json::{Map, Value};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use log::{info, debug, warn};

use crate::error::{Result, WetError};
use crate::utils::mask_api_key;

pub const DEFAULT_CONFIG_PATH: &str = "conf.json";
pub const DEFAULT_HISTORY_PATH: &str = "history";
pub const DEFAULT_API_HOST: &str = "https://api.yelp.com";

/// The provider refuses to page past this many results.
const PROVIDER_RESULT_WINDOW: usize = 1000;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub term: Map<String, Value>,
    pub repeat: usize,
    pub limit: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &mask_api_key(&self.client_id))
            .field("client_secret", &"*".repeat(8))
            .field("term", &self.term)
            .field("repeat", &self.repeat)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            WetError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
            .map_err(|e| WetError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(raw: &str) -> std::result::Result<Self, String> {
        let config: Config = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        config.validate()?;
        debug!("Parsed configuration: {:?}", config);
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.limit == 0 {
            return Err("limit must be at least 1".to_string());
        }
        if self.limit > PROVIDER_RESULT_WINDOW {
            warn!(
                "limit {} exceeds the provider's {} result window, later pages may fail",
                self.limit, PROVIDER_RESULT_WINDOW
            );
        }
        Ok(())
    }
}

/// File locations and endpoint host, resolved from the environment.
#[derive(Debug, Clone)]
pub struct Paths {
    pub config: PathBuf,
    pub history: PathBuf,
    pub api_host: String,
}

impl Paths {
    pub fn from_env() -> Self {
        let paths = Self {
            config: env::var("WET_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
            history: env::var("WET_HISTORY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_PATH)),
            api_host: env::var("YELP_API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_string()),
        };
        debug!("Resolved paths: {:?}", paths);
        paths
    }
}
