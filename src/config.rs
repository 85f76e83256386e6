//! Configuration module for vendauth.

use serde::Deserialize;
use std::path::Path;

use crate::{AuthError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT signing secret (must be set for production use).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token expiry in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiry in days.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_days: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_access_token_expiry() -> u64 {
    900
}

fn default_refresh_token_expiry() -> u64 {
    7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            jwt_secret: String::new(),
            access_token_expiry_secs: default_access_token_expiry(),
            refresh_token_expiry_days: default_refresh_token_expiry(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/vendauth.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Verification and reset token lifetimes.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Email verification token lifetime in hours.
    #[serde(default = "default_verification_expiry")]
    pub verification_expiry_hours: u64,
    /// Password reset token lifetime in minutes.
    #[serde(default = "default_reset_expiry")]
    pub reset_expiry_mins: u64,
}

fn default_verification_expiry() -> u64 {
    24
}

fn default_reset_expiry() -> u64 {
    60
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            verification_expiry_hours: default_verification_expiry(),
            reset_expiry_mins: default_reset_expiry(),
        }
    }
}

/// SMTP delivery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Whether email delivery is enabled. When disabled, every send is
    /// reported as a failure.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay hostname.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// From address for outgoing mail.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Base URL embedded in verification/reset links.
    #[serde(default = "default_frontend_base_url")]
    pub frontend_base_url: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "noreply@localhost".to_string()
}

fn default_frontend_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: default_from_address(),
            frontend_base_url: default_frontend_base_url(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/vendauth.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token lifetime settings.
    #[serde(default)]
    pub tokens: TokenConfig,
    /// SMTP settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| AuthError::Config(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.access_token_expiry_secs, 900);
        assert_eq!(config.server.refresh_token_expiry_days, 7);
        assert_eq!(config.tokens.verification_expiry_hours, 24);
        assert_eq!(config.tokens.reset_expiry_mins, 60);
        assert!(!config.smtp.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[server]
port = 9999
jwt_secret = "s3cret"

[tokens]
reset_expiry_mins = 30
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.jwt_secret, "s3cret");
        // Unspecified fields fall back to defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.tokens.reset_expiry_mins, 30);
        assert_eq!(config.tokens.verification_expiry_hours, 24);
    }

    #[test]
    fn test_parse_smtp_section() {
        let toml_str = r#"
[smtp]
enabled = true
host = "smtp.example.com"
port = 465
username = "mailer"
password = "hunter2"
from_address = "auth@example.com"
frontend_base_url = "https://app.example.com"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.smtp.enabled);
        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.frontend_base_url, "https://app.example.com");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8080").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(AuthError::Config(_))));
    }
}
