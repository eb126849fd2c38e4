//! Configuration constants, argument validation and feed URL builders.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{GDataError, Result};

/// ClientLogin endpoint used to obtain an auth token.
pub const CLIENT_LOGIN_URL: &str = "https://www.google.com/accounts/ClientLogin";

/// Host serving the Webmaster Tools feeds.
pub const WEBMASTER_TOOLS_HOST: &str = "https://www.google.com";

/// Host serving the Spreadsheets cell feeds.
pub const SPREADSHEETS_HOST: &str = "https://spreadsheets.google.com";

/// ClientLogin service name for Webmaster Tools.
pub const WEBMASTER_TOOLS_SERVICE: &str = "sitemaps";

/// ClientLogin service name for Spreadsheets.
pub const SPREADSHEETS_SERVICE: &str = "wise";

/// Application name reported to ClientLogin when none is configured.
pub const DEFAULT_SOURCE: &str = "gdata-ruby";

/// Root of all Webmaster Tools feeds.
pub const WEBMASTER_BASE_PATH: &str = "/webmasters/tools/feeds";

/// Feed listing every site on the account.
pub const SITES_FEED_PATH: &str = "/webmasters/tools/feeds/sites/";

/// Atom namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Webmaster Tools namespace.
pub const WEBMASTER_TOOLS_NS: &str = "http://schemas.google.com/webmasters/tools/2007";

/// Spreadsheets namespace.
pub const SPREADSHEETS_NS: &str = "http://schemas.google.com/spreadsheets/2006";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default guard on the number of pages a single walk may fetch.
pub const DEFAULT_MAX_PAGES: usize = 500;

/// Verification methods accepted by `verify_site`.
pub const VERIFICATION_METHODS: [&str; 2] = ["htmlpage", "metatag"];

/// Cell reference pattern: R<row>C<col>.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CELL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^R(\d+)C(\d+)$").expect("valid regex"));

/// Validate a site verification method name.
///
/// # Examples
/// ```
/// use gdata_client::config::validate_verification_method;
///
/// assert!(validate_verification_method("metatag").is_ok());
/// assert!(validate_verification_method("meta-tag").is_err());
/// ```
pub fn validate_verification_method(method: &str) -> Result<()> {
    if VERIFICATION_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(GDataError::InvalidArgument(format!(
            "unsupported verification method '{method}', expected one of: {}",
            VERIFICATION_METHODS.join(", ")
        )))
    }
}

/// Split an `R<row>C<col>` cell reference into its row and column.
///
/// # Examples
/// ```
/// use gdata_client::config::parse_cell_reference;
///
/// assert_eq!(parse_cell_reference("R2C11").unwrap(), (2, 11));
/// assert!(parse_cell_reference("B2").is_err());
/// ```
pub fn parse_cell_reference(cell: &str) -> Result<(u32, u32)> {
    let invalid = || {
        GDataError::InvalidArgument(format!(
            "invalid cell reference '{cell}', expected R<row>C<col> (e.g. R1C1)"
        ))
    };

    let caps = CELL_PATTERN.captures(cell).ok_or_else(invalid)?;
    let row = caps[1].parse().map_err(|_| invalid())?;
    let col = caps[2].parse().map_err(|_| invalid())?;
    Ok((row, col))
}

/// Percent-encode an identifier (usually a site URL) for use as a path segment.
pub fn escape_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Path of the feed for a single site.
///
/// # Examples
/// ```
/// use gdata_client::config::site_feed_path;
///
/// assert_eq!(
///     site_feed_path("http://www.mysite.com/"),
///     "/webmasters/tools/feeds/sites/http%3A%2F%2Fwww.mysite.com%2F"
/// );
/// ```
pub fn site_feed_path(site_id: &str) -> String {
    format!("{SITES_FEED_PATH}{}", escape_id(site_id))
}

/// Path of the keywords feed for a site.
pub fn keywords_feed_path(site_id: &str) -> String {
    format!("{WEBMASTER_BASE_PATH}/{}/keywords/", escape_id(site_id))
}

/// Path of the first crawl issues page for a site.
pub fn crawl_issues_feed_path(site_id: &str) -> String {
    format!("{WEBMASTER_BASE_PATH}/{}/crawlissues/", escape_id(site_id))
}

/// Path of a spreadsheet cells feed.
///
/// `projection` is `basic` for reads and `full` for writes.
pub fn cells_feed_path(
    spreadsheet_key: &str,
    worksheet_id: u32,
    private: bool,
    projection: &str,
) -> String {
    let visibility = if private { "private" } else { "public" };
    format!("/feeds/cells/{spreadsheet_key}/{worksheet_id}/{visibility}/{projection}")
}

/// Runtime configuration for the CLI and for building authenticated transports.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub email: String,
    pub password: String,
    pub source: String,
    pub timeout: Duration,
    pub max_pages: Option<usize>,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let email = std::env::var("GDATA_EMAIL")
            .map_err(|_| GDataError::Config("GDATA_EMAIL not set".into()))?;

        let password = std::env::var("GDATA_PASSWORD")
            .map_err(|_| GDataError::Config("GDATA_PASSWORD not set".into()))?;

        let source = std::env::var("GDATA_SOURCE").unwrap_or_else(|_| DEFAULT_SOURCE.into());

        let timeout_secs: u64 = std::env::var("GDATA_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(HTTP_TIMEOUT_SECS);

        // 0 disables the guard
        let max_pages = match std::env::var("GDATA_MAX_PAGES") {
            Ok(v) => {
                let n: usize = v
                    .parse()
                    .map_err(|_| GDataError::Config(format!("GDATA_MAX_PAGES is not a number: {v}")))?;
                (n > 0).then_some(n)
            }
            Err(_) => Some(DEFAULT_MAX_PAGES),
        };

        Ok(Self {
            email,
            password,
            source,
            timeout: Duration::from_secs(timeout_secs),
            max_pages,
        })
    }

    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            source: DEFAULT_SOURCE.into(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_pages: Some(DEFAULT_MAX_PAGES),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }
}
