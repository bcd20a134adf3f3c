use std::path::PathBuf;

use serde::Deserialize;

/// Application settings, read from the environment (and `.env`).
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_debug")]
    pub debug: bool,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_rewards_dir")]
    pub rewards_dir: PathBuf,
    /// External base URL used in reward links. Derived from the `Host` header when unset.
    pub public_url: Option<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_secret_key() -> String {
    "dev-secret-key".to_string()
}

fn default_database_url() -> String {
    "sqlite://app.db".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_debug() -> bool {
    true
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_rewards_dir() -> PathBuf {
    PathBuf::from("static/rewards")
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, envy::Error> {
        envy::from_env::<AppConfig>()
    }

    /// Base URL that reward links are built on, without a trailing slash.
    pub fn base_url(&self, host: Option<&str>) -> String {
        match (&self.public_url, host) {
            (Some(public_url), _) => public_url.trim_end_matches('/').to_string(),
            (None, Some(host)) => format!("http://{host}"),
            (None, None) => format!("http://localhost:{}", self.port),
        }
    }

    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "reward_wall=debug,tower_http=debug"
        } else {
            "reward_wall=info"
        }
    }
}
