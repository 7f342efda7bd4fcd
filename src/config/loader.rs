//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file values.
pub const ENV_BASE_URL: &str = "SITE_BASE_URL";
pub const ENV_ANALYTICS_HOST: &str = "SITE_ANALYTICS_HOST";
pub const ENV_ANALYTICS_KEY: &str = "SITE_ANALYTICS_KEY";
pub const ENV_BIND_ADDRESS: &str = "SITE_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => AppConfig::default(),
    };

    apply_env(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML config file without validating it.
pub fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Overlay non-empty environment values onto `config`.
pub fn apply_env<F>(config: &mut AppConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(v) = lookup(ENV_BASE_URL) {
        config.site.base_url = v;
    }
    if let Some(v) = lookup(ENV_ANALYTICS_HOST) {
        config.analytics.host = v;
    }
    if let Some(v) = lookup(ENV_ANALYTICS_KEY) {
        config.analytics.key = v;
    }
    if let Some(v) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn required_env() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_BASE_URL, "https://example.no"),
            (ENV_ANALYTICS_HOST, "https://eu.i.posthog.com"),
            (ENV_ANALYTICS_KEY, "phc_test"),
        ]
    }

    #[test]
    fn test_env_only() {
        let config = load_config_with(None, env_of(&required_env())).unwrap();
        assert_eq!(config.site.base_url, "https://example.no");
        assert_eq!(config.analytics.key, "phc_test");
    }

    #[test]
    fn test_missing_env_fails_startup() {
        let err = load_config_with(None, env_of(&[(ENV_BASE_URL, "https://example.no")])).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_env_does_not_override() {
        let mut config = AppConfig::default();
        config.site.base_url = "https://from-file.no".into();
        apply_env(&mut config, env_of(&[(ENV_BASE_URL, "  ")]));
        assert_eq!(config.site.base_url, "https://from-file.no");
    }

    #[test]
    fn test_file_then_env_override() {
        let path = std::env::temp_dir().join(format!("planlegger-site-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[site]
base_url = "https://from-file.no"
internal_path_prefixes = ["/ingest", "/api"]

[analytics]
host = "https://eu.i.posthog.com"
key = "phc_file"

[[routes]]
path = "/planlegger"
priority = 1.0
change_frequency = "weekly"
title = "Planlegger"
description = "Planlegg permisjonen"

[[redirects]]
from = "/gammel"
to = "/planlegger"
"#
        )
        .unwrap();

        let config = load_config_with(Some(&path), env_of(&[(ENV_ANALYTICS_KEY, "phc_env")])).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.site.base_url, "https://from-file.no");
        assert_eq!(config.site.internal_path_prefixes, vec!["/ingest", "/api"]);
        assert_eq!(config.analytics.key, "phc_env");
        assert_eq!(config.routes.len(), 1);
        assert!(config.redirects[0].permanent);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config_with(Some(Path::new("/nonexistent/site.toml")), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
