use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ContentError, ContentResult};

pub const DEFAULT_BASE_URL: &str = "http://renovalinksite.local/wp-json";
pub const DEFAULT_CUSTOM_NAMESPACE: &str = "renovalink/v1";
pub const DEFAULT_COMPANY_PAGE: &str = "informacion-de-la-empresa";
pub const DEFAULT_FALLBACK_EMAIL: &str = "info@renovalink.com";

/// Client settings. Loaded from an optional TOML file, then overridden by
/// environment variables (`API_BASE_URL`, `API_CACHE_TTL`, `CACHE_DISABLED`,
/// `FETCH_BUST_TOKEN`, ...).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub custom_namespace: String,
    pub cache_ttl_secs: u64,
    pub cache_disabled: bool,
    pub bust_token: Option<String>,
    pub timeout_secs: u64,
    pub max_concurrency: usize,
    pub company_page_slug: String,
    pub company_fallback_email: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            custom_namespace: DEFAULT_CUSTOM_NAMESPACE.to_string(),
            cache_ttl_secs: 300,
            cache_disabled: false,
            bust_token: None,
            timeout_secs: 10,
            max_concurrency: 8,
            company_page_slug: DEFAULT_COMPANY_PAGE.to_string(),
            company_fallback_email: DEFAULT_FALLBACK_EMAIL.to_string(),
            user_agent: concat!("renovalink-content/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self { Self::default().with_env_overrides() }

    /// Read a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> ContentResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| ContentError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            ContentError::Config(m) => ContentError::Config(format!("{}: {m}", path.display())),
            other => other,
        })
    }

    pub fn from_toml_str(raw: &str) -> ContentResult<Self> {
        toml::from_str(raw).map_err(|e| ContentError::Config(e.to_string()))
    }

    pub fn with_env_overrides(self) -> Self { self.apply_overrides(|k| std::env::var(k).ok()) }

    pub(crate) fn apply_overrides<F>(mut self, get: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let get = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = get("API_BASE_URL") { self.base_url = v; }
        if let Some(v) = get("API_CUSTOM_NAMESPACE") { self.custom_namespace = v; }
        if let Some(v) = get("API_CACHE_TTL").and_then(|s| s.parse().ok()) { self.cache_ttl_secs = v; }
        if let Some(v) = get("CACHE_DISABLED") { self.cache_disabled = parse_flag(&v); }
        if let Some(v) = get("FETCH_BUST_TOKEN") { self.bust_token = Some(v); }
        if let Some(v) = get("API_TIMEOUT_SECS").and_then(|s| s.parse().ok()) { self.timeout_secs = v; }
        if let Some(v) = get("API_MAX_CONCURRENCY").and_then(|s| s.parse().ok()) { self.max_concurrency = v; }
        if let Some(v) = get("COMPANY_PAGE_SLUG") { self.company_page_slug = v; }
        if let Some(v) = get("COMPANY_FALLBACK_EMAIL") { self.company_fallback_email = v; }
        self
    }

    pub fn ttl(&self) -> Duration { Duration::from_secs(self.cache_ttl_secs) }

    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs.max(1)) }

    /// Fan-out bound for media enrichment; never zero.
    pub fn concurrency(&self) -> usize { self.max_concurrency.max(1) }
}

fn parse_flag(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
