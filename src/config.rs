//! TOML configuration parsing and validation.
//!
//! ```toml
//! [db]
//! path = "./data/faqdesk.sqlite"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [admin]
//! password = "change-me"
//!
//! [seed]
//! enabled = true
//! ```
//!
//! The admin password may be supplied (or overridden) through the
//! `FAQDESK_ADMIN_PASSWORD` environment variable so it need not live in
//! the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `[admin].password`.
pub const ADMIN_PASSWORD_ENV: &str = "FAQDESK_ADMIN_PASSWORD";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    /// Shared secret for admin actions. `serve` refuses to start without one.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Insert the sample FAQs when the FAQ table is empty.
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_seed_enabled() -> bool {
    true
}

impl Config {
    /// Parse and validate a config from TOML text. Does not consult the
    /// environment.
    pub fn from_toml(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).with_context(|| "Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }
        if self.db.path.as_os_str().is_empty() {
            anyhow::bail!("db.path must not be empty");
        }
        if matches!(self.admin.password.as_deref(), Some(p) if p.is_empty()) {
            anyhow::bail!("admin.password must not be empty when set");
        }
        Ok(())
    }

    /// The configured admin secret, if any.
    pub fn admin_password(&self) -> Option<&str> {
        self.admin.password.as_deref()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config = Config::from_toml(&content)?;

    if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
        if !password.is_empty() {
            config.admin.password = Some(password);
        }
    }

    Ok(config)
}
