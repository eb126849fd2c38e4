//! Google Webmaster Tools feeds: sites, verification, keywords, crawl issues.
//!
//! # Example
//!
//! ```no_run
//! use gdata_client::auth::Credentials;
//! use gdata_client::webmaster::WebmasterTools;
//!
//! let mut wt = WebmasterTools::connect()?;
//! wt.transport_mut().authenticate(&Credentials::new("me@example.com", "secret"))?;
//!
//! for site in wt.sites()? {
//!     println!("{:?}", site.get_str("title"));
//! }
//! # Ok::<(), gdata_client::GDataError>(())
//! ```

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::config::{
    crawl_issues_feed_path, keywords_feed_path, site_feed_path, validate_verification_method,
    ATOM_NS, SITES_FEED_PATH, WEBMASTER_TOOLS_HOST, WEBMASTER_TOOLS_NS, WEBMASTER_TOOLS_SERVICE,
};
use crate::error::{GDataError, Result};
use crate::http::{FeedResponse, HttpTransport, Method, Transport};
use crate::normalize::{extract_verification_methods, flatten, NormalizedRecord, RecordValue};
use crate::pagination::{walk_pages, WalkOptions};
use crate::xml::{find_children, get_text};

/// One keyword the service associates with a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    /// Where the keyword was seen, e.g. `internal` or `external`.
    pub source: Option<String>,
}

/// Client for the Webmaster Tools feeds.
pub struct WebmasterTools<T: Transport> {
    transport: T,
    walk_options: WalkOptions,
}

impl WebmasterTools<HttpTransport> {
    /// Client over HTTP for the public Webmaster Tools host.
    pub fn connect() -> Result<Self> {
        Ok(Self::new(HttpTransport::new(
            WEBMASTER_TOOLS_HOST,
            WEBMASTER_TOOLS_SERVICE,
        )?))
    }
}

impl<T: Transport> WebmasterTools<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            walk_options: WalkOptions::default(),
        }
    }

    /// Bound pagination walks (crawl issues).
    #[must_use]
    pub fn with_walk_options(mut self, walk_options: WalkOptions) -> Self {
        self.walk_options = walk_options;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn ensure_authenticated(&self) -> Result<()> {
        if self.transport.is_authenticated() {
            Ok(())
        } else {
            Err(GDataError::AuthenticationRequired)
        }
    }

    /// All sites on the account.
    pub fn sites(&self) -> Result<Vec<NormalizedRecord>> {
        self.ensure_authenticated()?;
        let response = self
            .transport
            .fetch(Method::Get, SITES_FEED_PATH, None)?
            .error_for_status()?;

        let doc = Document::parse(&response.body)?;
        Ok(find_children(doc.root_element(), "entry")
            .map(parse_site_entry)
            .collect())
    }

    /// A single site, by its URL.
    pub fn site(&self, site_id: &str) -> Result<NormalizedRecord> {
        self.ensure_authenticated()?;
        let response = self
            .transport
            .fetch(Method::Get, &site_feed_path(site_id), None)?
            .error_for_status()?;

        parse_site_document(&response)
    }

    /// Add a site to the account and return the created entry.
    ///
    /// # Errors
    /// `RemoteService` unless the service answers 201 Created (403 when the
    /// site cannot be added, with the service's explanation as body).
    pub fn add_site(&self, url: &str) -> Result<NormalizedRecord> {
        self.ensure_authenticated()?;
        let content = format!(
            r#"<entry xmlns="{ATOM_NS}"><content src="{}" /></entry>"#,
            escape_attr(url)
        );
        let response = self
            .transport
            .fetch(Method::Post, SITES_FEED_PATH, Some(&content))?;

        match response.status {
            201 => {
                tracing::info!(url, "Site added");
                parse_site_document(&response)
            }
            _ => Err(remote_error(response)),
        }
    }

    /// Remove a site from the account.
    pub fn delete_site(&self, site_id: &str) -> Result<()> {
        self.ensure_authenticated()?;
        let response = self
            .transport
            .fetch(Method::Delete, &site_feed_path(site_id), None)?;

        match response.status {
            200 => {
                tracing::info!(site_id, "Site deleted");
                Ok(())
            }
            _ => Err(remote_error(response)),
        }
    }

    /// Start ownership verification of a site with `method` (`htmlpage` or
    /// `metatag`).
    ///
    /// Returns `true` when the service reports the site as verified under the
    /// same title.
    ///
    /// # Errors
    /// `InvalidArgument` for any other method, checked before anything else;
    /// `RemoteService` unless the service answers 200 (404 for unknown sites).
    pub fn verify_site(&self, site_id: &str, method: &str) -> Result<bool> {
        validate_verification_method(method)?;
        self.ensure_authenticated()?;

        let content = format!(
            concat!(
                r#"<entry xmlns="{atom}" xmlns:wt="{wt}">"#,
                "<id>{id}</id>",
                r#"<category scheme="http://schemas.google.com/g/2005#kind" term="http://schemas.google.com/webmasters/tools/2007#site-info"/>"#,
                r#"<wt:verification-method type="{method}" in-use="true"/>"#,
                "</entry>"
            ),
            atom = ATOM_NS,
            wt = WEBMASTER_TOOLS_NS,
            id = escape_text(site_id),
            method = method,
        );
        let response = self
            .transport
            .fetch(Method::Put, &site_feed_path(site_id), Some(&content))?;

        match response.status {
            200 => {
                let entry = parse_site_document(&response)?;
                let verified = entry.get("verified") == Some(&RecordValue::Bool(true));
                let same_site = entry.get_str("title") == Some(site_id);
                tracing::info!(site_id, method, verified, "Verification requested");
                Ok(verified && same_site)
            }
            _ => Err(remote_error(response)),
        }
    }

    /// Keywords found on or pointing to a site.
    pub fn keywords(&self, site_id: &str) -> Result<Vec<Keyword>> {
        self.ensure_authenticated()?;
        let response = self
            .transport
            .fetch(Method::Get, &keywords_feed_path(site_id), None)?
            .error_for_status()?;

        let doc = Document::parse(&response.body)?;
        Ok(find_children(doc.root_element(), "keyword")
            .map(|k| Keyword {
                keyword: get_text(k).to_string(),
                source: k.attribute("source").map(str::to_string),
            })
            .collect())
    }

    /// Every crawl issue of a site, across all feed pages.
    pub fn crawl_issues(&self, site_id: &str) -> Result<Vec<NormalizedRecord>> {
        self.ensure_authenticated()?;
        walk_pages(
            &crawl_issues_feed_path(site_id),
            |url| {
                let response = self
                    .transport
                    .fetch(Method::Get, url, None)?
                    .error_for_status()?;
                Ok(response.body)
            },
            self.walk_options,
        )
    }
}

/// Flatten a site entry and add its verification map.
fn parse_site_entry(entry: Node<'_, '_>) -> NormalizedRecord {
    extract_verification_methods(entry, flatten(entry))
}

/// Parse a document whose root is a single site entry.
fn parse_site_document(response: &FeedResponse) -> Result<NormalizedRecord> {
    let doc = Document::parse(&response.body)?;
    Ok(parse_site_entry(doc.root_element()))
}

fn remote_error(response: FeedResponse) -> GDataError {
    tracing::warn!(status = response.status, "Unexpected response status");
    GDataError::RemoteService {
        status: response.status,
        body: response.body,
    }
}

fn escape_attr(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

fn escape_text(value: &str) -> String {
    quick_xml::escape::partial_escape(value).into_owned()
}
