//! Layered mail configuration.
//!
//! Credentials come from a JSON config file, with every field overridable
//! by environment variables so scheduled runs (cron, CI) can inject them
//! without a file on disk. The core scorer takes no configuration; this
//! only feeds the delivery dispatcher.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment overrides, applied after the file layer.
const ENV_SENDER: &str = "SENDER_EMAIL";
const ENV_PASSWORD: &str = "APP_PASSWORD";
const ENV_RECEIVERS: &str = "RECEIVER_EMAILS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config file already exists at {path}")]
    AlreadyExists { path: PathBuf },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// SMTP delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub app_password: String,
    #[serde(default)]
    pub receiver_emails: Vec<String>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_smtp_host() -> String {
    String::from("smtp.gmail.com")
}

const fn default_smtp_port() -> u16 {
    465
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender_email: String::new(),
            app_password: String::new(),
            receiver_emails: Vec::new(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
        }
    }
}

impl MailConfig {
    /// Load the file layer (if the file exists) and apply environment
    /// overrides on top. A missing file is not an error; missing
    /// credentials are caught at send time.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(sender) = std::env::var(ENV_SENDER) {
            self.sender_email = sender.trim().to_owned();
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.app_password = password.trim().to_owned();
        }
        if let Ok(receivers) = std::env::var(ENV_RECEIVERS) {
            self.receiver_emails = receivers
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_owned)
                .collect();
        }
    }

    /// Names of the credential fields still unset, in a fixed order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.sender_email.trim().is_empty() {
            missing.push("sender_email");
        }
        if self.app_password.trim().is_empty() {
            missing.push("app_password");
        }
        if self.receiver_emails.is_empty() {
            missing.push("receiver_emails");
        }
        missing
    }

    /// Default config file location: `~/.config/marketmood/config.json`,
    /// falling back to the working directory when HOME is unset.
    pub fn default_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home)
                .join(".config")
                .join("marketmood")
                .join("config.json"),
            None => PathBuf::from("marketmood-config.json"),
        }
    }

    /// Write a template config with placeholder credentials. Refuses to
    /// overwrite an existing file.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.to_owned(),
            });
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                    path: path.to_owned(),
                    source,
                })?;
            }
        }

        let template = Self {
            sender_email: String::from("YOUR_EMAIL@gmail.com"),
            app_password: String::from("YOUR_APP_PASSWORD"),
            receiver_emails: vec![String::from("RECIPIENT@example.com")],
            ..Self::default()
        };
        let body = serde_json::to_string_pretty(&template)
            .unwrap_or_else(|_| String::from("{}"));

        std::fs::write(path, body).map_err(|source| ConfigError::Write {
            path: path.to_owned(),
            source,
        })
    }
}
