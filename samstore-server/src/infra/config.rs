use std::env;

use anyhow::{Context, anyhow};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Database settings
    pub database_url: Option<String>,

    // CORS settings
    pub cors_allowed_origins: Vec<String>,

    // Development settings
    pub dev_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            database_url: None,
            cors_allowed_origins: Vec::new(),
            dev_mode: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset variables
    /// fall back to the defaults; set but malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got {raw:?}"))?,
            None => defaults.server_port,
        };

        let dev_mode = match lookup("DEV_MODE") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("DEV_MODE must be true or false, got {raw:?}"))?,
            None => defaults.dev_mode,
        };

        Ok(Self {
            server_host: lookup("SERVER_HOST")
                .filter(|host| !host.trim().is_empty())
                .unwrap_or(defaults.server_host),
            server_port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.cors_allowed_origins),
            dev_mode,
        })
    }

    pub fn database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.database_url().is_err());
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("DATABASE_URL", "postgres://samstore@localhost/samstore"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,,"),
            ("DEV_MODE", "true"),
        ])
        .unwrap();

        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8080);
        assert_eq!(
            config.database_url().unwrap(),
            "postgres://samstore@localhost/samstore"
        );
        assert_eq!(config.cors_allowed_origins, ["http://a.test", "http://b.test"]);
        assert!(config.dev_mode);
    }

    #[test]
    fn malformed_port_is_an_error() {
        assert!(config_from(&[("SERVER_PORT", "eighty")]).is_err());
        assert!(config_from(&[("DEV_MODE", "maybe")]).is_err());
    }
}
