use match_feed::client::SOFASCORE_API;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Read feeds from `{dir}/{fixture_id}/*.json` instead of the HTTP API.
    pub feed_dir: Option<PathBuf>,
    pub api_base: String,
    /// Fixtures fetched at the same time. 1 processes them one by one.
    pub concurrency: usize,
    pub timeout: Duration,
    pub with_shots: bool,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_dir: None,
            api_base: SOFASCORE_API.to_owned(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            with_shots: true,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            feed_dir: get("MATCHSTATE_FEED_DIR").map(PathBuf::from),
            api_base: get("MATCHSTATE_API_BASE").unwrap_or(defaults.api_base),
            concurrency: get("MATCHSTATE_CONCURRENCY")
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.max(1))
                .unwrap_or(defaults.concurrency),
            timeout: get("MATCHSTATE_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            with_shots: get("MATCHSTATE_SHOTS")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.with_shots),
            log_filter: get("MATCHSTATE_LOG")
                .or_else(|| get("RUST_LOG"))
                .unwrap_or(defaults.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("MATCHSTATE_FEED_DIR", "/tmp/feeds"),
            ("MATCHSTATE_CONCURRENCY", "8"),
            ("MATCHSTATE_TIMEOUT_SECS", "3"),
            ("MATCHSTATE_SHOTS", "off"),
            ("MATCHSTATE_LOG", "debug"),
        ]);
        assert_eq!(s.feed_dir, Some(PathBuf::from("/tmp/feeds")));
        assert_eq!(s.concurrency, 8);
        assert_eq!(s.timeout, Duration::from_secs(3));
        assert!(!s.with_shots);
        assert_eq!(s.log_filter, "debug");
    }

    #[test]
    fn concurrency_is_at_least_one() {
        assert_eq!(settings(&[("MATCHSTATE_CONCURRENCY", "0")]).concurrency, 1);
        assert_eq!(settings(&[("MATCHSTATE_CONCURRENCY", "many")]).concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn log_filter_falls_back_to_rust_log() {
        assert_eq!(settings(&[("RUST_LOG", "info")]).log_filter, "info");
        assert_eq!(settings(&[("RUST_LOG", "info"), ("MATCHSTATE_LOG", "trace")]).log_filter, "trace");
    }
}
