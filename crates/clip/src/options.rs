// ABOUTME: Configuration options for the clip pipeline and the ClipperBuilder.
// ABOUTME: ClipperBuilder provides a fluent API for constructing Clipper instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::Clipper;
use crate::error::ClipError;

/// User-Agent sent with page fetches.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; BeeKeeper/1.0; +https://github.com/beekeeper-app)";

/// Accept header sent with page fetches.
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept-Language header sent with page fetches.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Configuration options for the clipper.
#[derive(Debug, Clone)]
pub struct Options {
    /// Bound on a single page fetch, DNS and body included.
    pub timeout: Duration,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub allow_private_networks: bool,
    pub max_redirects: usize,
    pub http_client: Option<reqwest::Client>,
    /// Extra request headers; these override the Accept defaults on a name clash.
    pub headers: HashMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            allow_private_networks: false,
            max_redirects: 10,
            http_client: None,
            headers: HashMap::new(),
        }
    }
}

impl Options {
    /// Request headers for a page fetch: the Accept pair plus any custom headers.
    pub(crate) fn request_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("accept".to_string(), self.accept.clone());
        headers.insert("accept-language".to_string(), self.accept_language.clone());
        for (key, value) in &self.headers {
            headers.insert(key.to_lowercase(), value.clone());
        }
        headers
    }
}

/// Builder for constructing Clipper instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClipperBuilder {
    opts: Options,
}

impl ClipperBuilder {
    /// Create a new ClipperBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.opts.accept = accept.into();
        self
    }

    /// Set the Accept-Language header.
    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.opts.accept_language = accept_language.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Maximum number of redirects followed before the fetch fails.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.opts.max_redirects = max;
        self
    }

    /// Use a custom HTTP client. Redirect and timeout settings are then the client's own.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Build the Clipper with the configured options.
    pub fn build(self) -> Result<Clipper, ClipError> {
        Clipper::new(self.opts)
    }
}

impl Default for ClipperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_look_like_a_browser() {
        let opts = Options::default();
        assert!(opts.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert!(!opts.allow_private_networks);

        let headers = opts.request_headers();
        assert_eq!(headers.get("accept").map(String::as_str), Some(DEFAULT_ACCEPT));
        assert_eq!(
            headers.get("accept-language").map(String::as_str),
            Some(DEFAULT_ACCEPT_LANGUAGE)
        );
    }

    #[test]
    fn custom_headers_override_defaults() {
        let mut opts = Options::default();
        opts.headers.insert("Accept-Language".to_string(), "de".to_string());
        opts.headers.insert("DNT".to_string(), "1".to_string());

        let headers = opts.request_headers();
        assert_eq!(headers.get("accept-language").map(String::as_str), Some("de"));
        assert_eq!(headers.get("dnt").map(String::as_str), Some("1"));
    }

    #[test]
    fn builder_carries_settings_into_clipper() {
        let clipper = ClipperBuilder::new()
            .timeout(Duration::from_secs(3))
            .user_agent("hive/2")
            .max_redirects(2)
            .allow_private_networks(true)
            .header("X-Trace", "abc")
            .build()
            .unwrap();

        let opts = clipper.options();
        assert_eq!(opts.timeout, Duration::from_secs(3));
        assert_eq!(opts.user_agent, "hive/2");
        assert_eq!(opts.max_redirects, 2);
        assert!(opts.allow_private_networks);
        assert_eq!(
            opts.request_headers().get("x-trace").map(String::as_str),
            Some("abc")
        );
    }
}
