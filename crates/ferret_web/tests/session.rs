use std::time::Duration;

use ferret_web::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, FetchPolicy, FetchSettings, Fetcher,
    ScrapeError, Scraper,
};
use pretty_assertions::assert_eq;

/// Transport serving a single canned page.
struct CannedFetcher {
    body: &'static [u8],
    content_type: &'static str,
}

#[async_trait::async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch_once(
        &self,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<FetchOutput, FetchError> {
        Ok(FetchOutput {
            bytes: self.body.to_vec(),
            metadata: FetchMetadata {
                origin_url: url.to_string(),
                final_url: url.to_string(),
                status: 200,
                content_type: Some(self.content_type.to_string()),
                byte_len: self.body.len() as u64,
            },
        })
    }
}

fn canned_scraper(body: &'static [u8], content_type: &'static str) -> Scraper<CannedFetcher> {
    let settings = FetchSettings {
        respect_delay: false,
        backoff_unit: Duration::from_millis(1),
        ..FetchSettings::default()
    };
    let transport = CannedFetcher { body, content_type };
    Scraper::with_policy(FetchPolicy::with_transport(settings, transport))
}

#[tokio::test]
async fn queries_before_any_fetch_fail_with_not_loaded() {
    let scraper = canned_scraper(b"", "text/html");
    let err = scraper.page().unwrap_err();
    assert_eq!(err, ScrapeError::NotLoaded);
    assert_eq!(scraper.last_url(), None);
}

#[tokio::test]
async fn get_stores_page_for_later_queries() {
    let mut scraper = canned_scraper(
        b"<html><head><title>Stored</title></head><body><h1>Hi</h1></body></html>",
        "text/html; charset=utf-8",
    );

    let html = scraper.get("http://canned.test/").await.expect("fetch ok");
    assert!(html.contains("<title>Stored</title>"));
    assert_eq!(scraper.last_url(), Some("http://canned.test/"));

    let page = scraper.page().expect("page loaded");
    assert_eq!(
        page.select("title").unwrap(),
        vec!["<title>Stored</title>".to_string()]
    );
    assert_eq!(page.visible_text(true), "Stored Hi");
}

#[tokio::test]
async fn get_decodes_legacy_charsets() {
    let mut scraper = canned_scraper(b"<p>caf\xe9</p>", "text/html; charset=ISO-8859-1");
    let html = scraper.get("http://canned.test/latin1").await.unwrap();
    assert!(html.contains("caf\u{e9}"));
}
