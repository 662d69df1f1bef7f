//! Portal configuration resolution: explicit flag > environment > default.

use std::time::Duration;

use ccnu_portal::PortalConfig;

pub const ENV_CAS_URL: &str = "CCNU_CAS_URL";
pub const ENV_XK_URL: &str = "CCNU_XK_URL";
pub const ENV_AUTH_TIMEOUT_MS: &str = "CCNU_AUTH_TIMEOUT_MS";
pub const ENV_SCRAPE_TIMEOUT_MS: &str = "CCNU_SCRAPE_TIMEOUT_MS";

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cas_url: Option<String>,
    pub xk_url: Option<String>,
    pub auth_timeout_ms: Option<u64>,
    pub scrape_timeout_ms: Option<u64>,
}

/// Resolve the portal configuration from flags and the process environment.
pub fn resolve_portal_config(overrides: &ConfigOverrides) -> PortalConfig {
    resolve_with(overrides, |key| std::env::var(key).ok())
}

fn resolve_with(overrides: &ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> PortalConfig {
    let defaults = PortalConfig::default();

    let cas_url = overrides
        .cas_url
        .clone()
        .or_else(|| env(ENV_CAS_URL))
        .unwrap_or(defaults.cas_url);
    let xk_url = overrides
        .xk_url
        .clone()
        .or_else(|| env(ENV_XK_URL))
        .unwrap_or(defaults.xk_url);

    let auth_timeout = overrides
        .auth_timeout_ms
        .map(Duration::from_millis)
        .or_else(|| env_millis(&env, ENV_AUTH_TIMEOUT_MS))
        .unwrap_or(defaults.auth_timeout);
    let scrape_timeout = overrides
        .scrape_timeout_ms
        .map(Duration::from_millis)
        .or_else(|| env_millis(&env, ENV_SCRAPE_TIMEOUT_MS))
        .unwrap_or(defaults.scrape_timeout);

    PortalConfig {
        cas_url,
        xk_url,
        auth_timeout,
        scrape_timeout,
    }
}

fn env_millis(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = env(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            tracing::warn!("Ignoring {key}={raw:?}: expected a positive number of milliseconds");
            None
        }
    }
}
