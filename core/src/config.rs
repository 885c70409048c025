//! Client configuration.

use std::time::Duration;

/// Sync API v8 root. Sync calls go to `<base>/sync`, project endpoints to
/// `<base>/projects/...`.
pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/sync/v8";

pub const DEFAULT_USER_AGENT: &str = concat!("todoist-rs/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every call made through a client. Immutable once the
/// client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) debug: bool,
}

impl ClientConfig {
    /// Configuration with the default endpoint and user agent, no transport
    /// timeout and debug tracing off.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            debug: false,
        }
    }

    /// Trailing slashes are stripped. The URL is validated when a request is
    /// built.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// An empty user agent omits the `User-Agent` header entirely.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overall timeout applied by the HTTP transport to each call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Emit request and response traces at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}
