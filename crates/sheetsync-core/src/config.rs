use crate::app_config::{AppConfig, DEFAULT_PROXY_URLS, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let document_url = require("SHEETSYNC_DOCUMENT_URL")?.trim().to_string();
    if !document_url.starts_with("http://") && !document_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHEETSYNC_DOCUMENT_URL".to_string(),
            reason: format!("'{document_url}' is not an http(s) URL"),
        });
    }

    let log_level = or_default("SHEETSYNC_LOG_LEVEL", "info");
    let seed_path = lookup("SHEETSYNC_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let sync_interval_secs = parse_u64("SHEETSYNC_SYNC_INTERVAL_SECS", "300")?;
    let retry_attempts = parse_u32("SHEETSYNC_RETRY_ATTEMPTS", "3")?;
    let retry_delay_ms = parse_u64("SHEETSYNC_RETRY_DELAY_MS", "1000")?;
    let cache_duration_secs = parse_u64("SHEETSYNC_CACHE_DURATION_SECS", "60")?;
    let request_timeout_secs = parse_u64("SHEETSYNC_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("SHEETSYNC_USER_AGENT", DEFAULT_USER_AGENT);

    let proxy_urls = match lookup("SHEETSYNC_PROXY_URLS") {
        Ok(raw) => parse_proxy_list(&raw),
        Err(_) => DEFAULT_PROXY_URLS.iter().map(|s| (*s).to_string()).collect(),
    };

    if retry_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHEETSYNC_RETRY_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHEETSYNC_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if sync_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHEETSYNC_SYNC_INTERVAL_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        document_url,
        log_level,
        seed_path,
        sync_interval_secs,
        retry_attempts,
        retry_delay_ms,
        cache_duration_secs,
        request_timeout_secs,
        proxy_urls,
        user_agent,
    })
}

/// Split a comma-separated proxy list, dropping blank entries.
///
/// An explicitly empty value disables proxies entirely (direct fetch only).
fn parse_proxy_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
