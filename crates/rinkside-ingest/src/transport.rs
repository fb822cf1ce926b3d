//! HTTP transport with a DNS-rediscovery fallback
//!
//! Two strategies, tried in order:
//!
//! 1. a direct GET through the shared client;
//! 2. on any primary failure, re-resolve the hostname through
//!    DNS-over-HTTPS and connect to the address directly, keeping the
//!    original hostname for TLS/SNI and the Host header and forcing
//!    HTTP/1.1 framing.
//!
//! Only when both strategies are exhausted does the caller see an
//! error, and that error carries both underlying messages.

use reqwest::header::HeaderMap;
use rinkside_common::{IngestError, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tracing::{debug, info, warn};

/// DNS A record type code
const RR_TYPE_A: u16 = 1;

/// Cap on response body text quoted in diagnostics
const BODY_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    rr_type: u16,
    data: String,
}

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

/// Upstream HTTP access for the whole pipeline
pub struct Transport {
    client: reqwest::Client,
    doh_endpoint: String,
    timeout: Duration,
}

impl Transport {
    pub fn new(doh_endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            doh_endpoint: doh_endpoint.into(),
            timeout,
        })
    }

    /// Fetch the body text at `url`, trying the primary strategy and
    /// then the DNS-rediscovery fallback.
    pub async fn fetch_text(&self, url: &str, headers: &HeaderMap) -> Result<String> {
        let primary_err = match self.fetch_direct(url, headers).await {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };
        warn!(error = %primary_err, "primary transport failed, trying DNS fallback");

        match self.fetch_rediscovered(url, headers).await {
            Ok(text) => {
                info!("fallback transport recovered the response");
                Ok(text)
            },
            Err(fallback_err) => Err(IngestError::Transport {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }

    /// Primary strategy: plain GET through the shared client
    async fn fetch_direct(&self, url: &str, headers: &HeaderMap) -> Result<String> {
        let response = self.client.get(url).headers(headers.clone()).send().await?;
        read_body_checked(response).await
    }

    /// Fallback strategy: DoH lookup, then a one-off client pinned to
    /// the discovered address. `resolve()` keeps the hostname intact
    /// for SNI and the Host header.
    async fn fetch_rediscovered(&self, url: &str, headers: &HeaderMap) -> Result<String> {
        let parsed = url::Url::parse(url)
            .map_err(|e| IngestError::config(format!("unparseable url '{}': {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| IngestError::config(format!("url without host: {}", url)))?;
        let port = parsed.port_or_known_default().unwrap_or(443);

        let address = self.resolve_ipv4(host).await?;
        debug!(%host, %address, port, "rediscovered upstream address");

        let pinned = reqwest::Client::builder()
            .resolve(host, SocketAddr::new(IpAddr::V4(address), port))
            .http1_only()
            .timeout(self.timeout)
            .build()?;

        let response = pinned.get(url).headers(headers.clone()).send().await?;
        read_body_checked(response).await
    }

    /// Resolve `host` to an IPv4 address through the DoH JSON API
    async fn resolve_ipv4(&self, host: &str) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.doh_endpoint)
            .query(&[("name", host), ("type", "A")])
            .header("accept", "application/dns-json")
            .send()
            .await?
            .error_for_status()?;

        let body: DohResponse = response.json().await?;
        body.answer
            .iter()
            .filter(|a| a.rr_type == RR_TYPE_A)
            .find_map(|a| a.data.parse::<Ipv4Addr>().ok())
            .ok_or_else(|| IngestError::Resolution(host.to_string()))
    }
}

/// Read the full body as text; non-2xx becomes a failure that still
/// carries (a truncated view of) the body for diagnostics.
async fn read_body_checked(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(IngestError::UpstreamStatus {
            status: status.as_u16(),
            body_excerpt: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        });
    }
    Ok(body)
}
