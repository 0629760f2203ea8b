//! Tracker configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Sections watched when none are configured.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "AskReddit",
    "funny",
    "gaming",
    "pics",
    "aww",
    "todayilearned",
    "worldnews",
    "science",
    "movies",
    "technology",
    "news",
    "interestingasfuck",
    "nottheonion",
    "dataisbeautiful",
    "askscience",
    "explainlikeimfive",
];

/// Largest accepted freshness window (one week).
pub const MAX_FRESHNESS_WINDOW_MINUTES: u64 = 7 * 24 * 60;

/// Browser-like User-Agent; the listing pages reject obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Configuration for the discovery and deletion loops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Sections to watch, visited in this order every discovery cycle.
    pub sections: Vec<String>,

    /// Base pause between discovery cycles.
    ///
    /// Default: 1 second.
    pub discovery_interval_seconds: u64,

    /// Pause between deletion checks.
    ///
    /// Default: 60 seconds.
    pub deletion_check_interval_seconds: u64,

    /// Posts older than this at discovery time are ignored.
    ///
    /// Default: 2 minutes.
    pub freshness_window_minutes: u64,

    /// Upper bound of the random delay added to each discovery pause.
    ///
    /// Default: 500 ms.
    pub jitter_max_millis: u64,

    /// Per-request timeout for every page fetch.
    ///
    /// Default: 10 seconds.
    pub request_timeout_seconds: u64,

    /// Host serving the section listings.
    pub listing_base_url: String,

    /// Host that relative permalinks are resolved against.
    pub permalink_base_url: String,

    pub user_agent: String,
    pub accept_language: String,

    /// File that deletion records are appended to.
    pub audit_log_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sections: DEFAULT_SECTIONS.iter().map(|s| s.to_string()).collect(),
            discovery_interval_seconds: 1,
            deletion_check_interval_seconds: 60,
            freshness_window_minutes: 2,
            jitter_max_millis: 500,
            request_timeout_seconds: 10,
            listing_base_url: "https://old.reddit.com".to_string(),
            permalink_base_url: "https://old.reddit.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            audit_log_path: PathBuf::from("deleted_log.txt"),
        }
    }
}

impl TrackerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from any variable lookup, such as a map in
    /// tests or the process environment in [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(sections) = lookup("TRACKER_SECTIONS") {
            config.sections = parse_sections(&sections);
        }
        if let Some(v) = parse_var(&lookup, "DISCOVERY_INTERVAL_SECONDS")? {
            config.discovery_interval_seconds = v;
        }
        if let Some(v) = parse_var(&lookup, "DELETION_CHECK_INTERVAL_SECONDS")? {
            config.deletion_check_interval_seconds = v;
        }
        if let Some(v) = parse_var(&lookup, "FRESHNESS_WINDOW_MINUTES")? {
            config.freshness_window_minutes = v;
        }
        if let Some(v) = parse_var(&lookup, "JITTER_MAX_MILLIS")? {
            config.jitter_max_millis = v;
        }
        if let Some(v) = parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS")? {
            config.request_timeout_seconds = v;
        }
        if let Some(v) = lookup("LISTING_BASE_URL") {
            config.listing_base_url = v;
        }
        if let Some(v) = lookup("PERMALINK_BASE_URL") {
            config.permalink_base_url = v;
        }
        if let Some(v) = lookup("TRACKER_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = lookup("ACCEPT_LANGUAGE") {
            config.accept_language = v;
        }
        if let Some(v) = lookup("AUDIT_LOG_PATH") {
            config.audit_log_path = PathBuf::from(v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the loops cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            anyhow::bail!("at least one section must be configured");
        }
        if self.deletion_check_interval_seconds == 0 {
            anyhow::bail!("DELETION_CHECK_INTERVAL_SECONDS must be greater than 0");
        }
        if self.request_timeout_seconds == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECONDS must be greater than 0");
        }
        if self.freshness_window_minutes > MAX_FRESHNESS_WINDOW_MINUTES {
            anyhow::bail!(
                "FRESHNESS_WINDOW_MINUTES must be at most {}",
                MAX_FRESHNESS_WINDOW_MINUTES
            );
        }
        let listing_base =
            Url::parse(&self.listing_base_url).context("LISTING_BASE_URL must be a valid URL")?;
        if listing_base.cannot_be_a_base() {
            anyhow::bail!("LISTING_BASE_URL must be a hierarchical URL");
        }
        Url::parse(&self.permalink_base_url).context("PERMALINK_BASE_URL must be a valid URL")?;
        Ok(())
    }

    /// Set the sections to watch.
    pub fn with_sections(mut self, sections: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sections = sections.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Set the discovery interval.
    pub fn with_discovery_interval_seconds(mut self, seconds: u64) -> Self {
        self.discovery_interval_seconds = seconds;
        self
    }

    /// Set the deletion check interval.
    pub fn with_deletion_check_interval_seconds(mut self, seconds: u64) -> Self {
        self.deletion_check_interval_seconds = seconds;
        self
    }

    /// Set the freshness window.
    pub fn with_freshness_window_minutes(mut self, minutes: u64) -> Self {
        self.freshness_window_minutes = minutes;
        self
    }

    /// Set the listing host.
    pub fn with_listing_base_url(mut self, url: impl Into<String>) -> Self {
        self.listing_base_url = url.into();
        self
    }

    /// Set the permalink host.
    pub fn with_permalink_base_url(mut self, url: impl Into<String>) -> Self {
        self.permalink_base_url = url.into();
        self
    }

    /// Set the audit log path.
    pub fn with_audit_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log_path = path.into();
        self
    }

    pub fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery_interval_seconds)
    }

    pub fn deletion_check_interval(&self) -> Duration {
        Duration::from_secs(self.deletion_check_interval_seconds)
    }

    pub fn jitter_max(&self) -> Duration {
        Duration::from_millis(self.jitter_max_millis)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Maximum post age at discovery, or an error if it does not fit a
    /// `chrono::Duration`.
    pub fn freshness_window(&self) -> Result<chrono::Duration> {
        i64::try_from(self.freshness_window_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .context("FRESHNESS_WINDOW_MINUTES is out of range")
    }

    /// URL of a section's "new posts" listing.
    ///
    /// The section name is a single percent-encoded path segment.
    pub fn listing_url(&self, section: &str) -> Result<Url> {
        let mut url =
            Url::parse(&self.listing_base_url).context("LISTING_BASE_URL must be a valid URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("LISTING_BASE_URL must be a hierarchical URL"))?
            .pop_if_empty()
            .extend(["r", section, "new", ""]);
        Ok(url)
    }
}

/// Split a comma-separated section list, dropping blanks.
fn parse_sections(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_start_matches("r/").to_string())
        .collect()
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid number", name)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();

        assert_eq!(config.sections.len(), 16);
        assert_eq!(config.sections[0], "AskReddit");
        assert_eq!(config.discovery_interval(), Duration::from_secs(1));
        assert_eq!(config.deletion_check_interval(), Duration::from_secs(60));
        assert_eq!(config.freshness_window().unwrap(), chrono::Duration::minutes(2));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TrackerConfig::new()
            .with_sections(["rust", "programming"])
            .with_freshness_window_minutes(5)
            .with_listing_base_url("http://localhost:8080/");

        assert_eq!(config.sections, vec!["rust", "programming"]);
        assert_eq!(config.freshness_window_minutes, 5);
        assert_eq!(
            config.listing_url("rust").unwrap().as_str(),
            "http://localhost:8080/r/rust/new/"
        );
    }

    #[test]
    fn test_listing_url_encodes_section() {
        let config = TrackerConfig::new().with_listing_base_url("https://board.test");

        assert_eq!(
            config.listing_url("a/b?c d").unwrap().as_str(),
            "https://board.test/r/a%2Fb%3Fc%20d/new/"
        );
    }

    #[test]
    fn test_validate_rejects_huge_freshness_window() {
        let config = TrackerConfig::new().with_freshness_window_minutes(1_000_000_000_000);
        assert!(config.validate().is_err());

        let wrapped = TrackerConfig::new().with_freshness_window_minutes(u64::MAX);
        assert!(wrapped.validate().is_err());
        assert!(wrapped.freshness_window().is_err());

        let week = TrackerConfig::new().with_freshness_window_minutes(MAX_FRESHNESS_WINDOW_MINUTES);
        assert!(week.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_opaque_listing_base() {
        let config = TrackerConfig::new().with_listing_base_url("mailto:someone@example.com");
        assert!(config.validate().is_err());
        assert!(config.listing_url("rust").is_err());
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_unset_uses_defaults() {
        let config = TrackerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let config = TrackerConfig::from_lookup(lookup(&[
            ("TRACKER_SECTIONS", "rust, r/news"),
            ("DISCOVERY_INTERVAL_SECONDS", " 5 "),
            ("DELETION_CHECK_INTERVAL_SECONDS", "120"),
            ("FRESHNESS_WINDOW_MINUTES", "10"),
            ("JITTER_MAX_MILLIS", "0"),
            ("REQUEST_TIMEOUT_SECONDS", "3"),
            ("LISTING_BASE_URL", "http://localhost:8080"),
            ("PERMALINK_BASE_URL", "http://localhost:8081"),
            ("TRACKER_USER_AGENT", "tracker-test/1.0"),
            ("ACCEPT_LANGUAGE", "de-DE"),
            ("AUDIT_LOG_PATH", "/tmp/deleted.txt"),
        ]))
        .unwrap();

        assert_eq!(config.sections, vec!["rust", "news"]);
        assert_eq!(config.discovery_interval(), Duration::from_secs(5));
        assert_eq!(config.deletion_check_interval(), Duration::from_secs(120));
        assert_eq!(config.freshness_window_minutes, 10);
        assert_eq!(config.jitter_max(), Duration::ZERO);
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.listing_base_url, "http://localhost:8080");
        assert_eq!(config.permalink_base_url, "http://localhost:8081");
        assert_eq!(config.user_agent, "tracker-test/1.0");
        assert_eq!(config.accept_language, "de-DE");
        assert_eq!(config.audit_log_path, PathBuf::from("/tmp/deleted.txt"));
    }

    #[test]
    fn test_from_lookup_rejects_malformed_number() {
        let err = TrackerConfig::from_lookup(lookup(&[("DISCOVERY_INTERVAL_SECONDS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("DISCOVERY_INTERVAL_SECONDS"));

        let err = TrackerConfig::from_lookup(lookup(&[("FRESHNESS_WINDOW_MINUTES", "-1")]))
            .unwrap_err();
        assert!(err.to_string().contains("FRESHNESS_WINDOW_MINUTES"));
    }

    #[test]
    fn test_from_lookup_validates_result() {
        assert!(TrackerConfig::from_lookup(lookup(&[("TRACKER_SECTIONS", " , ")])).is_err());
        assert!(
            TrackerConfig::from_lookup(lookup(&[("FRESHNESS_WINDOW_MINUTES", "99999999")]))
                .is_err()
        );
    }

    #[test]
    fn test_parse_sections() {
        assert_eq!(
            parse_sections(" rust, r/news ,,pics "),
            vec!["rust", "news", "pics"]
        );
        assert!(parse_sections(" , ").is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_sections() {
        let config = TrackerConfig::new().with_sections(Vec::<String>::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = TrackerConfig::new().with_permalink_base_url("not a url");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"sections": ["rust"], "freshness_window_minutes": 10}"#)
                .unwrap();

        assert_eq!(config.sections, vec!["rust"]);
        assert_eq!(config.freshness_window_minutes, 10);
        assert_eq!(config.deletion_check_interval_seconds, 60);
    }
}
