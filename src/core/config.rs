use crate::core::records::Charity;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_currency() -> String {
    "USD".to_string()
}

fn default_checkout_url() -> String {
    "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_ap-payment&paykey=".to_string()
}

/// Credentials and redirect URLs for the adaptive payments API.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentConfig {
    pub endpoint: String,
    pub user_id: String,
    pub password: String,
    pub signature: String,
    pub application_id: String,
    /// Where the provider sends the supporter after paying, `${payKey}` is
    /// substituted by the provider.
    pub return_url: String,
    pub cancel_url: String,
    /// The payKey is appended to this to build the supporter's redirect.
    #[serde(default = "default_checkout_url")]
    pub checkout_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        PaymentConfig {
            endpoint: "https://svcs.sandbox.paypal.com/AdaptivePayments".to_string(),
            user_id: String::new(),
            password: String::new(),
            signature: String::new(),
            application_id: "APP-80W284485P519543T".to_string(),
            return_url: "http://localhost:8081/finish_donation?payKey=${payKey}".to_string(),
            cancel_url: "http://localhost:8081/cancel_donation?payKey=${payKey}".to_string(),
            checkout_url: default_checkout_url(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub charities: Vec<Charity>,
    #[serde(default)]
    pub payment: PaymentConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("in", "codito", "pledge").context("Could not determine project directories")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.yaml"))
    }

    /// Directory holding the record store, `data_path` wins over the
    /// platform default.
    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!(
            charities = config.charities.len(),
            "Successfully loaded config"
        );
        Ok(config)
    }
}
