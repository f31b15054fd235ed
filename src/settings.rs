//! Resolved runtime settings.
//!
//! Command-line flags and their environment fallbacks are parsed by clap in
//! [`crate::cli`]; this module validates them into a [`Settings`] value that the
//! rest of the application consumes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

use crate::api::ApiClient;
use crate::api::client::normalize_prefix;
use crate::router::Page;
use crate::state::notifications::DEFAULT_NOTIFICATION_DURATION;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: Url,
    pub api_prefix: String,
    pub request_timeout: Duration,
    pub notification_duration: Duration,
    pub start_page: String,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Raw values as they come off the command line
#[derive(Debug, Clone, Default)]
pub struct RawSettings<'a> {
    pub server: &'a str,
    pub api_prefix: &'a str,
    pub timeout_secs: u64,
    pub page: &'a str,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    pub fn from_cli(raw: RawSettings<'_>) -> Result<Self> {
        let server_url = parse_server_url(raw.server)?;
        if raw.timeout_secs == 0 {
            bail!("Request timeout must be at least one second");
        }

        // Unknown pages are allowed; the router renders its not-found view for them
        let start_page = raw.page.trim().to_lowercase();
        let start_page =
            if start_page.is_empty() { Page::Dashboard.id().to_string() } else { start_page };

        Ok(Self {
            server_url,
            api_prefix: normalize_prefix(raw.api_prefix),
            request_timeout: Duration::from_secs(raw.timeout_secs),
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            start_page,
            log_file: raw.log_file,
            verbose: raw.verbose,
        })
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(self.server_url.clone(), &self.api_prefix, self.request_timeout)
            .context("Failed to build HTTP client")
    }
}

fn parse_server_url(raw: &str) -> Result<Url> {
    let url =
        Url::parse(raw.trim()).with_context(|| format!("Invalid server URL: {}", raw.trim()))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Server URL must use http or https, got {}", url.scheme());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(server: &str) -> RawSettings<'_> {
        RawSettings {
            server,
            api_prefix: DEFAULT_API_PREFIX,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page: "dashboard",
            log_file: None,
            verbose: false,
        }
    }

    #[test]
    fn test_defaults_resolve() {
        let settings = Settings::from_cli(raw(DEFAULT_SERVER_URL)).unwrap();
        assert_eq!(settings.server_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(settings.api_prefix, "/api");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.notification_duration, Duration::from_secs(3));
        assert_eq!(settings.start_page, "dashboard");
    }

    #[test]
    fn test_prefix_is_normalized() {
        let settings =
            Settings::from_cli(RawSettings { api_prefix: "/v1/", ..raw(DEFAULT_SERVER_URL) })
                .unwrap();
        assert_eq!(settings.api_prefix, "/v1");
    }

    #[test]
    fn test_invalid_server_url_rejected() {
        let err = Settings::from_cli(raw("not a url")).unwrap_err();
        assert!(err.to_string().contains("Invalid server URL"));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = Settings::from_cli(raw("ftp://example.com")).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(
            Settings::from_cli(RawSettings { timeout_secs: 0, ..raw(DEFAULT_SERVER_URL) }).is_err()
        );
    }

    #[test]
    fn test_start_page_lowercased() {
        let settings =
            Settings::from_cli(RawSettings { page: " Chat ", ..raw(DEFAULT_SERVER_URL) }).unwrap();
        assert_eq!(settings.start_page, "chat");
    }

    #[test]
    fn test_api_client_uses_prefix() {
        let settings = Settings::from_cli(raw("http://localhost:9000")).unwrap();
        let client = settings.api_client().unwrap();
        assert_eq!(
            client.endpoint_url("/chat/conversations").unwrap().as_str(),
            "http://localhost:9000/api/chat/conversations"
        );
    }
}
