//! HTTP transport for GData feeds.
//!
//! Resource methods talk to the service through the [`Transport`] trait so
//! they can be exercised against canned responses. [`HttpTransport`] is the
//! blocking `reqwest` implementation.

use std::fmt;
use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::auth::{client_login, Credentials};
use crate::config::{CLIENT_LOGIN_URL, HTTP_TIMEOUT_SECS};
use crate::error::{GDataError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("gdata-client/", env!("CARGO_PKG_VERSION"));

/// Protocol version requested from the service.
const GDATA_VERSION: &str = "2";

/// Content type of Atom request bodies.
const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// Maximum number of attempts for idempotent requests.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// HTTP verbs used by the feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether repeating the request is safe.
    #[must_use]
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub status: u16,
    pub body: String,
}

impl FeedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `RemoteService`, keeping the body.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(GDataError::RemoteService {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Session-aware access to the feed service.
///
/// Implementations return every completed response, whatever its status;
/// only connection-level failures are errors.
pub trait Transport {
    /// Whether a session token is available.
    fn is_authenticated(&self) -> bool;

    /// Issue a request. `url` is either absolute or a path on the service host.
    fn fetch(&self, method: Method, url: &str, body: Option<&str>) -> Result<FeedResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn fetch(&self, method: Method, url: &str, body: Option<&str>) -> Result<FeedResponse> {
        (**self).fetch(method, url, body)
    }
}

/// Create a configured HTTP client.
pub fn create_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Blocking HTTP transport for one GData service.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    service: String,
    login_url: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Create a transport for `service` (ClientLogin service name) served
    /// from `base_url`.
    pub fn new(base_url: impl Into<String>, service: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(
            create_client(Duration::from_secs(HTTP_TIMEOUT_SECS))?,
            base_url,
            service,
        ))
    }

    /// Create a transport around an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service: service.into(),
            login_url: CLIENT_LOGIN_URL.to_string(),
            token: None,
        }
    }

    /// Use a different ClientLogin endpoint.
    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    /// Use an auth token obtained elsewhere.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Log in with ClientLogin and keep the token for later requests.
    pub fn authenticate(&mut self, credentials: &Credentials) -> Result<()> {
        let token = client_login(&self.client, &self.login_url, credentials, &self.service)?;
        self.token = Some(token);
        Ok(())
    }

    /// Drop the session token.
    pub fn logout(&mut self) {
        self.token = None;
    }

    fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    fn build(&self, method: Method, url: &str, body: Option<&str>) -> RequestBuilder {
        let mut request = self
            .client
            .request(method.as_reqwest(), url)
            .header("GData-Version", GDATA_VERSION);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("GoogleLogin auth={token}"));
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, ATOM_CONTENT_TYPE)
                .body(body.to_string());
        }
        request
    }
}

impl Transport for HttpTransport {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Retries GET and DELETE on connection errors and 5xx responses with
    /// exponential backoff. POST and PUT are sent once.
    fn fetch(&self, method: Method, url: &str, body: Option<&str>) -> Result<FeedResponse> {
        let url = self.resolve(url);
        let attempts = if method.is_idempotent() { MAX_RETRIES } else { 1 };
        let mut last_error: Option<String> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1000ms, 2000ms
                let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
                tracing::debug!(attempt, delay_ms = delay, "Retrying after delay");
                thread::sleep(Duration::from_millis(delay));
            }

            tracing::debug!(method = %method, url = %url, "Sending request");
            match self.build(method, &url, body).send() {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() && attempt + 1 < attempts {
                        tracing::warn!(
                            status = %status,
                            attempt = attempt + 1,
                            max_retries = attempts,
                            "Server error, will retry"
                        );
                        last_error = Some(format!("Server error: {status}"));
                        continue;
                    }

                    let body = response.text()?;
                    tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received response");
                    return Ok(FeedResponse::new(status.as_u16(), body));
                }
                Err(e) if (e.is_connect() || e.is_timeout()) && attempts > 1 => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = attempts,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(GDataError::Http(e)),
            }
        }

        Err(GDataError::RetriesExhausted {
            attempts,
            message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
        })
    }
}
