//! ClientLogin authentication.
//!
//! ClientLogin answers a form POST with a plain-text body of `key=value`
//! lines. The `Auth` value is the token sent on later requests as
//! `Authorization: GoogleLogin auth=<token>`.

use std::fmt;

use reqwest::blocking::Client;

use crate::config::{ClientConfig, DEFAULT_SOURCE};
use crate::error::{GDataError, Result};

/// Account type accepted for both Google and hosted accounts.
const ACCOUNT_TYPE: &str = "HOSTED_OR_GOOGLE";

/// Account credentials for ClientLogin.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Application name reported to the service.
    pub source: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl From<&ClientConfig> for Credentials {
    fn from(config: &ClientConfig) -> Self {
        Self::new(&config.email, &config.password).with_source(&config.source)
    }
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("source", &self.source)
            .finish()
    }
}

/// Find `key` in a ClientLogin response body.
fn response_value<'a>(body: &'a str, key: &str) -> Option<&'a str> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
}

/// Extract the auth token from a successful ClientLogin response.
///
/// # Examples
/// ```
/// use gdata_client::auth::parse_login_response;
///
/// let body = "SID=DQAAAGgA\nLSID=DQAAAGsA\nAuth=DQAAAGgAdk3\n";
/// assert_eq!(parse_login_response(body).unwrap(), "DQAAAGgAdk3");
/// ```
pub fn parse_login_response(body: &str) -> Result<String> {
    response_value(body, "Auth")
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GDataError::LoginFailed("response contained no Auth token".into()))
}

/// Log in to `service` and return the auth token.
///
/// # Errors
/// `LoginFailed` when the credentials are rejected (the service's `Error=`
/// reason is included) or no token is returned; `Http` on transport failure.
pub fn client_login(
    client: &Client,
    login_url: &str,
    credentials: &Credentials,
    service: &str,
) -> Result<String> {
    let form = [
        ("accountType", ACCOUNT_TYPE),
        ("Email", credentials.email.as_str()),
        ("Passwd", credentials.password.as_str()),
        ("service", service),
        ("source", credentials.source.as_str()),
    ];

    tracing::info!(email = %credentials.email, service, "Logging in with ClientLogin");

    let response = client.post(login_url).form(&form).send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        let reason = response_value(&body, "Error").unwrap_or("unknown error");
        tracing::warn!(status = %status, reason, "ClientLogin rejected credentials");
        return Err(GDataError::LoginFailed(format!("{reason} (status {status})")));
    }

    parse_login_response(&body)
}
