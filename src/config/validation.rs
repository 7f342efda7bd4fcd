//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required values are present (base URL, analytics host and key)
//! - Validate value ranges and address formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Route/robots consistency is checked when the Site is built, not here

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{AppConfig, INGEST_PREFIX};

/// One failed validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required value absent from both file and environment.
    Missing { field: &'static str, env: &'static str },
    /// Value present but unusable.
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing { field, env } => {
                write!(f, "{} is required (set it in the config file or {})", field, env)
            }
            ValidationError::Invalid { field, reason } => write!(f, "{} is invalid: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a fully merged configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.site.base_url.is_empty() {
        errors.push(ValidationError::Missing {
            field: "site.base_url",
            env: "SITE_BASE_URL",
        });
    } else if let Err(reason) = check_origin(&config.site.base_url) {
        errors.push(ValidationError::invalid("site.base_url", reason));
    }

    if config.analytics.host.is_empty() {
        errors.push(ValidationError::Missing {
            field: "analytics.host",
            env: "SITE_ANALYTICS_HOST",
        });
    } else if let Err(reason) = check_origin(&config.analytics.host) {
        errors.push(ValidationError::invalid("analytics.host", reason));
    }

    if config.analytics.key.trim().is_empty() {
        errors.push(ValidationError::Missing {
            field: "analytics.key",
            env: "SITE_ANALYTICS_KEY",
        });
    }

    let mut seen = HashSet::new();
    for prefix in &config.site.internal_path_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::invalid(
                "site.internal_path_prefixes",
                format!("{:?} must start with '/'", prefix),
            ));
        }
        if !seen.insert(prefix.as_str()) {
            errors.push(ValidationError::invalid(
                "site.internal_path_prefixes",
                format!("{:?} is listed twice", prefix),
            ));
        }
    }
    if !seen.contains(INGEST_PREFIX) {
        errors.push(ValidationError::invalid(
            "site.internal_path_prefixes",
            format!("must include the analytics ingestion path {}", INGEST_PREFIX),
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::invalid(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::invalid("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::invalid(
            "observability.metrics_address",
            format!("{:?} is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An origin is an absolute http(s) URL with no path, query or trailing slash.
pub fn check_origin(raw: &str) -> Result<(), String> {
    if raw.ends_with('/') {
        return Err("must not end with '/'".into());
    }

    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("scheme {:?} is not http or https", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".into());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must be an origin without path, query or fragment".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.site.base_url = "https://example.no".into();
        config.analytics.host = "https://eu.i.posthog.com".into();
        config.analytics.key = "phc_test".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_required_values_reported_together() {
        let errors = validate_config(&AppConfig::default()).unwrap_err();
        let missing: Vec<&str> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::Missing { env, .. } => Some(*env),
                _ => None,
            })
            .collect();
        assert_eq!(missing, ["SITE_BASE_URL", "SITE_ANALYTICS_HOST", "SITE_ANALYTICS_KEY"]);
    }

    #[test]
    fn test_base_url_shape() {
        for bad in ["https://example.no/", "example.no", "ftp://example.no", "https://example.no/sub"] {
            let mut config = valid_config();
            config.site.base_url = bad.into();
            let errors = validate_config(&config).unwrap_err();
            assert!(
                matches!(&errors[0], ValidationError::Invalid { field: "site.base_url", .. }),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn test_ingest_prefix_required() {
        let mut config = valid_config();
        config.site.internal_path_prefixes = vec!["/api".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("/ingest"));
    }

    #[test]
    fn test_prefix_shape_and_duplicates() {
        let mut config = valid_config();
        config.site.internal_path_prefixes = vec!["/ingest".into(), "ingest".into(), "/ingest".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_bind_address_and_timeout() {
        let mut config = valid_config();
        config.listener.bind_address = "localhost".into();
        config.timeouts.request_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
