// src/config/options.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppOptions {
    pub fetch: FetchOptions,
    pub export: ExportOptions,
    /// Read a saved HTML document instead of fetching.
    pub input: Option<PathBuf>,
}

impl AppOptions {
    /// Defaults overlaid with whatever the process environment sets.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        opts.fetch.apply_env(|key| env::var(key).ok());
        opts
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchOptions {
    pub landing_url: String,
    pub fallback_url: String,
    pub timeout_secs: f64,
    pub retries: u32,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            landing_url: s!(DEFAULT_LANDING_URL),
            fallback_url: s!(DEFAULT_FALLBACK_URL),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            user_agent: s!(DEFAULT_USER_AGENT),
        }
    }
}

impl FetchOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }

    /// Overlay values from a key lookup (the environment in production).
    /// Unparsable numbers keep the current value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_LANDING_URL) { self.landing_url = v; }
        if let Some(v) = get(ENV_FALLBACK_URL) { self.fallback_url = v; }
        if let Some(v) = get(ENV_USER_AGENT) { self.user_agent = v; }

        if let Some(v) = get(ENV_TIMEOUT) {
            match v.parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => self.timeout_secs = secs,
                _ => loge!("{ENV_TIMEOUT}={v:?} is not a positive number; keeping {}", self.timeout_secs),
            }
        }
        if let Some(v) = get(ENV_RETRIES) {
            match v.parse::<i64>() {
                Ok(n) => self.retries = n.clamp(1, u32::MAX as i64) as u32,
                Err(_) => loge!("{ENV_RETRIES}={v:?} is not an integer; keeping {}", self.retries),
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub out_path: PathBuf,
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_OUT_FILE),
            pretty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_overrides_urls_and_numbers() {
        let mut f = FetchOptions::default();
        f.apply_env(lookup(&[
            (ENV_LANDING_URL, "https://example.org/plan/"),
            (ENV_TIMEOUT, "7.5"),
            (ENV_RETRIES, "5"),
            (ENV_USER_AGENT, "test-agent"),
        ]));
        assert_eq!(f.landing_url, "https://example.org/plan/");
        assert_eq!(f.fallback_url, DEFAULT_FALLBACK_URL);
        assert_eq!(f.timeout(), Duration::from_millis(7_500));
        assert_eq!(f.retries, 5);
        assert_eq!(f.user_agent, "test-agent");
    }

    #[test]
    fn retries_floor_at_one_and_garbage_is_ignored() {
        let mut f = FetchOptions::default();
        f.apply_env(lookup(&[(ENV_RETRIES, "0"), (ENV_TIMEOUT, "soon")]));
        assert_eq!(f.retries, 1);
        assert_eq!(f.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn blank_values_do_not_override() {
        let mut f = FetchOptions::default();
        f.apply_env(lookup(&[(ENV_FALLBACK_URL, "   ")]));
        assert_eq!(f.fallback_url, DEFAULT_FALLBACK_URL);
    }
}
