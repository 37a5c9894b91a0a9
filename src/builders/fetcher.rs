use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::builders::reporter::Reporter;
use crate::core::config::SnippetConfig;

/// What the transport got back for one GET.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Response body. Left empty for non-success statuses.
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait defining the network access the fetcher needs.
/// Swapped for in-memory implementations in tests.
pub trait SnippetTransport {
    /// Issues a GET against `url`.
    ///
    /// An `Err` means no HTTP response was obtained at all (DNS, connect,
    /// TLS, body read). Non-success statuses are a successful `Ok`.
    fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// Concrete implementation of `SnippetTransport` using a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl SnippetTransport for HttpTransport {
    fn get(&self, url: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(TransportResponse {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Where the lines of a [`Snippet`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetOrigin {
    /// The key has no config entry.
    NotConfigured,
    /// Served from the entry cache, no network access.
    Cache,
    /// Downloaded during this call and now cached.
    Network,
    /// Missing URL, error status or transport failure. Logged, no lines.
    Failed,
}

#[derive(Debug, Clone)]
pub struct Snippet {
    pub lines: Vec<String>,
    pub origin: SnippetOrigin,
}

impl Snippet {
    fn empty(origin: SnippetOrigin) -> Self {
        Self {
            lines: Vec::new(),
            origin,
        }
    }
}

/// Resolves the ignore lines of a target key.
///
/// A cache hit never touches the network. A miss issues exactly one GET and,
/// on success, stores the lines in the entry cache so every later call for
/// the same key in this run is a hit. Failures are soft: they are reported
/// and yield an empty snippet. There are no retries.
pub struct SnippetFetcher<'a> {
    transport: &'a dyn SnippetTransport,
    reporter: &'a dyn Reporter,
}

impl<'a> SnippetFetcher<'a> {
    pub fn new(transport: &'a dyn SnippetTransport, reporter: &'a dyn Reporter) -> Self {
        Self {
            transport,
            reporter,
        }
    }

    pub fn fetch(&self, key: &str, config: &mut SnippetConfig) -> Snippet {
        let Some(entry) = config.get_mut(key) else {
            return Snippet::empty(SnippetOrigin::NotConfigured);
        };

        if !entry.cache.is_empty() {
            self.reporter.info(Some(key), "Using cached gitignore data...");
            return Snippet {
                lines: entry.cache.clone(),
                origin: SnippetOrigin::Cache,
            };
        }

        self.reporter.info(Some(key), "Fetching gitignore data...");
        let Some(url) = entry.url.as_deref() else {
            self.reporter
                .warn(Some(key), "Invalid config item: no URL configured");
            return Snippet::empty(SnippetOrigin::Failed);
        };

        let response = match self.transport.get(url) {
            Ok(response) => response,
            Err(e) => {
                self.reporter.warn(
                    Some(key),
                    &format!("Error to get gitignore data from {url}: {e:#}"),
                );
                return Snippet::empty(SnippetOrigin::Failed);
            }
        };

        if !response.is_success() {
            self.reporter.warn(
                Some(key),
                &format!(
                    "Error to get gitignore data from {url}. Status code: {}",
                    response.status
                ),
            );
            return Snippet::empty(SnippetOrigin::Failed);
        }

        let lines: Vec<String> = response.body.lines().map(str::to_string).collect();
        self.reporter.info(
            Some(key),
            &format!(
                "Gitignore data fetched successfully. Caching {} lines of raw data...",
                lines.len()
            ),
        );

        entry.cache = lines.clone();
        Snippet {
            lines,
            origin: SnippetOrigin::Network,
        }
    }
}
