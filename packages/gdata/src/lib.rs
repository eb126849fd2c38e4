//! GData client - Google Data Atom feeds as generic records.
//!
//! This crate talks to Google's Atom-based Data APIs (Webmaster Tools,
//! Spreadsheets) and returns entries as [`NormalizedRecord`]s, whose shape
//! follows the XML they were built from.
//!
//! # Example
//!
//! ```
//! use roxmltree::Document;
//! use gdata_client::normalize::{flatten, RecordValue};
//!
//! let xml = r#"<entry xmlns:wt="http://schemas.google.com/webmasters/tools/2007">
//!     <wt:indexed>true</wt:indexed>
//!     <wt:crawled>2008-01-01T00:00:00Z</wt:crawled>
//! </entry>"#;
//! let doc = Document::parse(xml).unwrap();
//! let record = flatten(doc.root_element());
//!
//! assert_eq!(record.get("indexed"), Some(&RecordValue::Bool(true)));
//! assert_eq!(record.get_str("crawled"), Some("2008-01-01T00:00:00Z"));
//! ```
//!
//! # Architecture
//!
//! - [`normalize`]: key normalization, coercion, flattening, verification map
//! - [`pagination`]: following `rel="next"` links across feed pages
//! - [`xml`]: XML utilities
//! - [`http`]: transport trait and blocking HTTP implementation
//! - [`auth`]: ClientLogin
//! - [`config`]: constants, argument validation, feed paths, env config
//! - [`error`]: Error types and Result alias
//! - [`webmaster`]: Webmaster Tools feeds
//! - [`spreadsheet`]: Spreadsheets cell feeds
//! - [`cli`]: Command-line interface

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod pagination;
pub mod spreadsheet;
pub mod webmaster;
pub mod xml;

// Re-export commonly used items
pub use error::{GDataError, Result};
pub use http::{FeedResponse, HttpTransport, Method, Transport};
pub use normalize::{extract_verification_methods, flatten, NormalizedRecord, RecordValue};
pub use pagination::{walk_pages, FeedPage, PageLink, WalkOptions};
pub use spreadsheet::Spreadsheet;
pub use webmaster::{Keyword, WebmasterTools};
