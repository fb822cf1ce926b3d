//! Static configuration for the upstream statistics API
//!
//! The upstream query-parameter contract is loosely versioned: names
//! like `filterQuery`/`searchQuery`/`take` have shifted across API
//! revisions, so requests are always built from a parameter mapping
//! rather than positional arguments.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use rinkside_common::{IngestError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

// ============================================================================
// Upstream Constants
// ============================================================================

/// Cached statistics endpoint serving both the results list and per-game detail
pub const DEFAULT_BASE_URL: &str = "https://data.sihf.ch/Statistic/api/cms/cache300";

/// DNS-over-HTTPS JSON endpoint used by the fallback transport strategy
pub const DEFAULT_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Upstream callback name; the decoder accepts any identifier, this is
/// only what we ask for
pub const DEFAULT_CALLBACK: &str = "externalStatisticsCallback";

/// Positional upstream filter: season/league/region/phase/date range/
/// deferred state/team/opponent
pub const DEFAULT_FILTER_QUERY: &str = "2026/123/all/all/06.09.2025-29.03.2026/all/105957/all";

/// Positional upstream search: game types/season range/team id
pub const DEFAULT_SEARCH_QUERY: &str = "1,10,11/2015-2099/105957";

pub const DEFAULT_FILTER_BY: &str =
    "season,league,region,phase,date,deferredState,team1,team2";

// ============================================================================
// Pipeline Defaults
// ============================================================================

pub const DEFAULT_OUTPUT_DIR: &str = "./public";
pub const DEFAULT_TAKE: u32 = 20;

/// Ceiling on secondary detail requests per run; the detail endpoint is
/// slow and rate-limited, and most records need no enrichment
pub const DEFAULT_MAX_DETAIL: usize = 5;

/// Politeness throttle before each detail request
pub const DEFAULT_DETAIL_THROTTLE_MS: u64 = 250;

/// Per-request timeout; bounds a dead fallback path, nothing else
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Artifact Names
// ============================================================================

/// Canonical machine-readable result list
pub const RESULTS_ARTIFACT: &str = "results.json";

/// Verbatim upstream payload, kept for forensics
pub const RAW_ARTIFACT: &str = "raw-results.json";

/// Short human-readable run status
pub const STATUS_ARTIFACT: &str = "status.txt";

/// Runtime configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub doh_endpoint: String,
    pub output_dir: PathBuf,

    /// Case-insensitive substrings a record must contain to be kept;
    /// empty means keep everything
    pub team_filters: Vec<String>,

    pub filter_query: String,
    pub search_query: String,
    pub filter_by: String,
    pub callback: String,
    pub language: String,
    pub take: u32,

    pub max_detail: usize,
    pub detail_throttle: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            team_filters: vec!["sursee".to_string()],
            filter_query: DEFAULT_FILTER_QUERY.to_string(),
            search_query: DEFAULT_SEARCH_QUERY.to_string(),
            filter_by: DEFAULT_FILTER_BY.to_string(),
            callback: DEFAULT_CALLBACK.to_string(),
            language: "de".to_string(),
            take: DEFAULT_TAKE,
            max_detail: DEFAULT_MAX_DETAIL,
            detail_throttle: Duration::from_millis(DEFAULT_DETAIL_THROTTLE_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (`RINKSIDE_*`),
    /// falling back to the defaults above.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("RINKSIDE_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(url) = std::env::var("RINKSIDE_DOH_ENDPOINT") {
            config.doh_endpoint = url;
        }
        if let Ok(dir) = std::env::var("RINKSIDE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(filters) = std::env::var("RINKSIDE_TEAM_FILTERS") {
            config.team_filters = filters
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(query) = std::env::var("RINKSIDE_FILTER_QUERY") {
            config.filter_query = query;
        }
        if let Ok(query) = std::env::var("RINKSIDE_SEARCH_QUERY") {
            config.search_query = query;
        }
        if let Ok(take) = std::env::var("RINKSIDE_TAKE") {
            config.take = take
                .parse()
                .map_err(|_| IngestError::config(format!("invalid RINKSIDE_TAKE: {}", take)))?;
        }
        if let Ok(max) = std::env::var("RINKSIDE_MAX_DETAIL") {
            config.max_detail = max
                .parse()
                .map_err(|_| IngestError::config(format!("invalid RINKSIDE_MAX_DETAIL: {}", max)))?;
        }
        if let Ok(secs) = std::env::var("RINKSIDE_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                IngestError::config(format!("invalid RINKSIDE_TIMEOUT_SECS: {}", secs))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Query parameters for the results list endpoint
    pub fn list_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("alias", "results".to_string()),
            ("filterQuery", self.filter_query.clone()),
            ("searchQuery", self.search_query.clone()),
            ("orderBy", "date".to_string()),
            ("orderByDescending", "false".to_string()),
            ("take", self.take.to_string()),
            ("filterBy", self.filter_by.clone()),
            ("callback", self.callback.clone()),
            ("language", self.language.clone()),
        ]
    }

    /// Query parameters for the per-game detail endpoint
    pub fn detail_params(&self, game_id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("alias", "gameDetail".to_string()),
            ("searchQuery", game_id.to_string()),
            ("callback", self.callback.clone()),
            ("language", self.language.clone()),
        ]
    }

    /// Full URL for the results list request
    pub fn list_url(&self) -> Result<String> {
        let url = Url::parse_with_params(&self.base_url, self.list_params())
            .map_err(|e| IngestError::config(format!("bad base url '{}': {}", self.base_url, e)))?;
        Ok(url.into())
    }

    /// Full URL for one detail request
    pub fn detail_url(&self, game_id: &str) -> Result<String> {
        let url = Url::parse_with_params(&self.base_url, self.detail_params(game_id))
            .map_err(|e| IngestError::config(format!("bad base url '{}': {}", self.base_url, e)))?;
        Ok(url.into())
    }

    /// Header set sent on every upstream request
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (compatible; rinkside)"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de-CH,de;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.sihf.ch/"));
        headers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn list_url_carries_alias_and_callback() {
        let config = Config::default();
        let url = config.list_url().unwrap();
        assert!(url.starts_with(DEFAULT_BASE_URL));
        assert!(url.contains("alias=results"));
        assert!(url.contains("callback=externalStatisticsCallback"));
        assert!(url.contains("take=20"));
    }

    #[test]
    fn detail_url_targets_single_game() {
        let config = Config::default();
        let url = config.detail_url("105957").unwrap();
        assert!(url.contains("alias=gameDetail"));
        assert!(url.contains("searchQuery=105957"));
    }

    #[test]
    fn params_are_a_mapping_not_positions() {
        // Parameter names must survive reordering; downstream builds the
        // query string from pairs.
        let config = Config::default();
        let params = config.list_params();
        assert!(params.iter().any(|(k, v)| *k == "alias" && v == "results"));
        assert!(params.iter().any(|(k, _)| *k == "filterQuery"));
        assert!(params.iter().any(|(k, _)| *k == "filterBy"));
    }

    #[test]
    fn headers_include_browser_surface() {
        let headers = Config::default().headers();
        assert!(headers.contains_key(ACCEPT));
        assert!(headers.contains_key(USER_AGENT));
        assert!(headers.contains_key(REFERER));
    }
}
