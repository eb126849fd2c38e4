//! Webmaster Tools feeds parsed end to end from recorded responses.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use gdata_client::{
    FeedResponse, GDataError, Keyword, Method, RecordValue, Result, Transport, WalkOptions,
    WebmasterTools,
};
use pretty_assertions::assert_eq;

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("webmaster_tools")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Authenticated transport that answers with queued responses.
struct RecordedTransport {
    responses: RefCell<Vec<FeedResponse>>,
    requests: RefCell<Vec<(Method, String)>>,
}

impl RecordedTransport {
    fn new(responses: Vec<FeedResponse>) -> Self {
        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn with_fixtures(names: &[&str]) -> Self {
        Self::new(
            names
                .iter()
                .map(|name| FeedResponse::new(200, load_fixture(name)))
                .collect(),
        )
    }

    fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(_, url)| url.clone()).collect()
    }
}

impl Transport for RecordedTransport {
    fn is_authenticated(&self) -> bool {
        true
    }

    fn fetch(&self, method: Method, url: &str, _body: Option<&str>) -> Result<FeedResponse> {
        self.requests.borrow_mut().push((method, url.to_string()));
        let mut responses = self.responses.borrow_mut();
        assert!(!responses.is_empty(), "unexpected request to {url}");
        Ok(responses.remove(0))
    }
}

#[test]
fn test_sites_feed() {
    let transport = RecordedTransport::with_fixtures(&["sites.xml"]);
    let wt = WebmasterTools::new(&transport);

    let sites = wt.sites().unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(transport.urls(), vec!["/webmasters/tools/feeds/sites/"]);

    let site = &sites[0];
    assert_eq!(site.len(), 15);
    assert_eq!(site.get_str("title"), Some("http://www.mysite.com/"));
    assert_eq!(site.get("verified"), Some(&RecordValue::Bool(true)));
    assert_eq!(site.get("indexed"), Some(&RecordValue::Bool(true)));
    assert_eq!(site.get_str("preferred_domain"), Some("none"));
    assert_eq!(site.get_str("crawl_rate"), Some("normal"));
    assert_eq!(site.get_str("geolocation"), Some("US"));

    // Attribute-only children become records of their attributes.
    let content = site.get("content").and_then(RecordValue::as_record).unwrap();
    assert_eq!(content.get_str("src"), Some("http://www.mysite.com/"));

    let links = site.get("link").and_then(RecordValue::as_list).unwrap();
    assert_eq!(links.len(), 2);
    let rels: Vec<_> = links
        .iter()
        .filter_map(RecordValue::as_record)
        .filter_map(|l| l.get_str("rel"))
        .collect();
    assert_eq!(rels, vec!["self", "edit"]);

    let methods = site
        .get("verification_methods")
        .and_then(RecordValue::as_record)
        .unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(
        methods.get_str("metatag"),
        Some(r#"<meta name="verify-v1" content="nVryYYKT4lSCwaZ/avK1utx6/gtm78x9latRJPCdCuk=" >"#)
    );
    assert_eq!(methods.get_str("htmlpage"), Some("google937559d39027a39d.html"));

    let other = &sites[1];
    assert_eq!(other.get_str("title"), Some("http://www.myothersite.com/"));
    assert_eq!(other.get("verified"), Some(&RecordValue::Bool(false)));
    assert_eq!(other.get("indexed"), Some(&RecordValue::Bool(false)));
    assert!(!other.contains_key("crawled"));
}

#[test]
fn test_sites_feed_serializes_as_plain_json() {
    let transport = RecordedTransport::with_fixtures(&["sites.xml"]);
    let sites = WebmasterTools::new(&transport).sites().unwrap();

    let json = serde_json::to_value(&sites[1]).unwrap();
    assert_eq!(json["verified"], serde_json::json!(false));
    assert_eq!(json["content"]["src"], "http://www.myothersite.com/");
    assert_eq!(
        json["verification_methods"]["htmlpage"],
        "google1234567890abcdef.html"
    );
}

#[test]
fn test_site_entry() {
    let transport = RecordedTransport::with_fixtures(&["site.xml"]);
    let wt = WebmasterTools::new(&transport);

    let site = wt.site("http://www.mysite.com/").unwrap();
    assert_eq!(
        transport.urls(),
        vec!["/webmasters/tools/feeds/sites/http%3A%2F%2Fwww.mysite.com%2F"]
    );
    assert_eq!(site.get_str("title"), Some("http://www.mysite.com/"));
    assert_eq!(site.get("verified"), Some(&RecordValue::Bool(false)));
    assert!(site.get("link").and_then(RecordValue::as_record).is_some());
}

#[test]
fn test_add_site_returns_created_entry() {
    let transport = RecordedTransport::new(vec![FeedResponse::new(201, load_fixture("add_site.xml"))]);
    let wt = WebmasterTools::new(&transport);

    let site = wt.add_site("http://www.mynewsite.com/").unwrap();
    assert_eq!(site.get_str("title"), Some("http://www.mynewsite.com/"));
    assert_eq!(site.get("indexed"), Some(&RecordValue::Bool(false)));
    assert_eq!(transport.requests.borrow()[0].0, Method::Post);
}

#[test]
fn test_add_site_forbidden() {
    let transport = RecordedTransport::new(vec![FeedResponse::new(
        403,
        "The site is already on the account",
    )]);
    let wt = WebmasterTools::new(&transport);

    let err = wt.add_site("http://www.mysite.com/").unwrap_err();
    assert!(matches!(
        err,
        GDataError::RemoteService { status: 403, ref body } if body == "The site is already on the account"
    ));
}

#[test]
fn test_verify_site() {
    let transport = RecordedTransport::with_fixtures(&["verify_site.xml"]);
    let wt = WebmasterTools::new(&transport);

    assert!(wt.verify_site("http://www.mysite.com/", "metatag").unwrap());
    assert_eq!(transport.requests.borrow()[0].0, Method::Put);
}

#[test]
fn test_verify_site_unverified_entry() {
    let transport = RecordedTransport::with_fixtures(&["site.xml"]);
    let wt = WebmasterTools::new(&transport);

    assert!(!wt.verify_site("http://www.mysite.com/", "htmlpage").unwrap());
}

#[test]
fn test_verify_unknown_site() {
    let transport = RecordedTransport::new(vec![FeedResponse::new(404, "Site not found")]);
    let wt = WebmasterTools::new(&transport);

    assert!(matches!(
        wt.verify_site("http://www.unknown.com/", "metatag"),
        Err(GDataError::RemoteService { status: 404, .. })
    ));
}

#[test]
fn test_keywords_feed() {
    let transport = RecordedTransport::with_fixtures(&["keywords.xml"]);
    let wt = WebmasterTools::new(&transport);

    let keywords = wt.keywords("http://www.mysite.com/").unwrap();
    assert_eq!(
        transport.urls(),
        vec!["/webmasters/tools/feeds/http%3A%2F%2Fwww.mysite.com%2F/keywords/"]
    );
    assert_eq!(keywords.len(), 4);
    assert_eq!(
        keywords[0],
        Keyword {
            keyword: "gardening".into(),
            source: Some("internal".into()),
        }
    );
    assert_eq!(keywords[3].keyword, "compost & soil");
    assert_eq!(keywords[3].source.as_deref(), Some("external"));
}

#[test]
fn test_crawl_issues_follow_next_link() {
    let transport =
        RecordedTransport::with_fixtures(&["crawl_errors_page_1.xml", "crawl_errors_page_2.xml"]);
    let wt = WebmasterTools::new(&transport);

    let issues = wt.crawl_issues("http://www.site.com/").unwrap();
    assert_eq!(
        transport.urls(),
        vec![
            "/webmasters/tools/feeds/http%3A%2F%2Fwww.site.com%2F/crawlissues/".to_string(),
            "https://www.google.com/webmasters/tools/feeds/http%3A%2F%2Fwww.site.com%2F/crawlissues/?start-index=2&max-results=1".to_string(),
        ]
    );

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].len(), 9);
    assert_eq!(issues[0].get_str("issue_type"), Some("http-error"));
    assert_eq!(issues[0].get_str("url"), Some("http://www.site.com/missing-page"));
    assert_eq!(issues[0].get_str("detail"), Some("404 (Not found)"));
    assert_eq!(issues[1].get_str("crawl_type"), Some("mobile-chtml"));
    assert_eq!(issues[1].get_str("issue_type"), Some("robots-txt"));
}

#[test]
fn test_crawl_issues_page_limit() {
    let transport =
        RecordedTransport::with_fixtures(&["crawl_errors_page_1.xml", "crawl_errors_page_2.xml"]);
    let wt = WebmasterTools::new(&transport).with_walk_options(WalkOptions::with_max_pages(1));

    assert!(matches!(
        wt.crawl_issues("http://www.site.com/"),
        Err(GDataError::PageLimitExceeded { limit: 1 })
    ));
    assert_eq!(transport.urls().len(), 1);
}
