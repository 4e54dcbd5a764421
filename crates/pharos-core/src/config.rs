use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid, or if no storage
/// directory can be determined.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if env var values are invalid, or if no storage
/// directory can be determined.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_url = or_default("PHAROS_API_URL", "https://api.pharos.dev");
    let collect_url =
        lookup("PHAROS_COLLECT_URL").unwrap_or_else(|_| format!("{api_url}/api/track"));

    let api_key = lookup("PHAROS_API_KEY").ok().filter(|v| !v.is_empty());
    let auth_token = lookup("PHAROS_AUTH_TOKEN").ok().filter(|v| !v.is_empty());
    let site_id = lookup("PHAROS_SITE_ID").ok().filter(|v| !v.is_empty());

    let log_level = or_default("PHAROS_LOG_LEVEL", "info");

    // Falls back to `~/.pharos` when PHAROS_DATA_DIR is unset. A host without a
    // resolvable home directory must set the variable explicitly.
    let storage_dir = match lookup("PHAROS_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => dirs::home_dir()
            .map(|home| home.join(".pharos"))
            .ok_or_else(|| ConfigError::MissingEnvVar("PHAROS_DATA_DIR".to_string()))?,
    };

    let user_agent = or_default("PHAROS_USER_AGENT", "pharos/0.1 (analytics-client)");
    let request_timeout_secs = parse_u64("PHAROS_REQUEST_TIMEOUT_SECS", "10")?;
    let poll_interval_ms = parse_u64("PHAROS_POLL_INTERVAL_MS", "5000")?;
    let watch_interval_ms = parse_u64("PHAROS_WATCH_INTERVAL_MS", "500")?;

    Ok(AppConfig {
        api_url,
        collect_url,
        api_key,
        auth_token,
        site_id,
        log_level,
        storage_dir,
        user_agent,
        request_timeout_secs,
        poll_interval_ms,
        watch_interval_ms,
    })
}
