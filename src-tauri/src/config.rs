use std::time::Duration;

use tracing::info;
use url::Url;

use crate::api::OptimizationTarget;
use crate::error::RtlForgeError;
use crate::spec_store::KeyValueStore;

/// Store file holding user preferences.
pub const PREFERENCES_STORE: &str = "preferences.json";

pub const BACKEND_URL_KEY: &str = "backend_url";
pub const REQUEST_TIMEOUT_KEY: &str = "request_timeout_secs";
pub const OPTIMIZATION_TARGET_KEY: &str = "optimization_target";

/// Process-level override for the backend URL when no preference is saved.
pub const BACKEND_URL_ENV: &str = "RTLFORGE_BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Resolved settings for talking to the generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Always ends with `/` so endpoint paths join underneath it.
    pub base_url: Url,
    /// `None` leaves timeouts to the HTTP stack.
    pub timeout: Option<Duration>,
    pub optimization_target: OptimizationTarget,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8000/").expect("default backend URL is valid"),
            timeout: None,
            optimization_target: OptimizationTarget::default(),
        }
    }
}

impl ClientConfig {
    /// Build a config from saved preferences.
    ///
    /// URL precedence: saved preference, then `env_url`, then
    /// [`DEFAULT_BACKEND_URL`]. Blank preferences count as unset.
    pub fn resolve<F>(preference: F, env_url: Option<String>) -> Result<Self, RtlForgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pref = |key: &str| preference(key).filter(|v| !v.trim().is_empty());

        let raw_url = pref(BACKEND_URL_KEY)
            .or(env_url.filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let base_url = normalize_base_url(&raw_url)?;

        let timeout = match pref(REQUEST_TIMEOUT_KEY) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    RtlForgeError::Config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        REQUEST_TIMEOUT_KEY, raw
                    ))
                })?;
                if secs == 0 {
                    None
                } else {
                    Some(Duration::from_secs(secs))
                }
            }
            None => None,
        };

        let optimization_target = match pref(OPTIMIZATION_TARGET_KEY) {
            Some(raw) => OptimizationTarget::parse(&raw).ok_or_else(|| {
                RtlForgeError::Config(format!(
                    "{} must be one of power, performance, area, balanced; got '{}'",
                    OPTIMIZATION_TARGET_KEY, raw
                ))
            })?,
            None => OptimizationTarget::default(),
        };

        Ok(Self {
            base_url,
            timeout,
            optimization_target,
        })
    }

    /// Resolve from a preferences store and the process environment.
    pub fn from_store<K: KeyValueStore>(store: &K) -> Result<Self, RtlForgeError> {
        let config = Self::resolve(
            |key| store.get(key).and_then(|v| v.as_str().map(|s| s.to_string())),
            std::env::var(BACKEND_URL_ENV).ok(),
        )?;
        info!(
            "Using backend {} (timeout: {:?}, target: {})",
            config.base_url, config.timeout, config.optimization_target
        );
        Ok(config)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, RtlForgeError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| RtlForgeError::Config(format!("Invalid backend URL '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RtlForgeError::Config(format!(
            "Backend URL must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
