use ferret_logging::ferret_debug;

use crate::decode::decode_text;
use crate::fetch::{FetchPolicy, FetchSettings, Fetcher, NullObserver, ReqwestFetcher};
use crate::query::PageDocument;
use crate::types::{FetchError, FetchResult, ScrapeError};

/// Stateful scrape session: remembers the last fetched page so queries can
/// run without re-fetching.
pub struct Scraper<F: Fetcher = ReqwestFetcher> {
    policy: FetchPolicy<F>,
    last_url: Option<String>,
    last_html: Option<String>,
}

impl Scraper<ReqwestFetcher> {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Ok(Self::with_policy(FetchPolicy::new(settings)?))
    }
}

impl<F: Fetcher> Scraper<F> {
    pub fn with_policy(policy: FetchPolicy<F>) -> Self {
        Self {
            policy,
            last_url: None,
            last_html: None,
        }
    }

    /// Fetch `url` through the retry policy, store the decoded page, and
    /// return the html text.
    pub async fn get(&mut self, url: &str) -> Result<&str, FetchError> {
        self.get_with_headers(url, &[]).await
    }

    pub async fn get_with_headers(
        &mut self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<&str, FetchError> {
        let FetchResult {
            output,
            attempt_count,
        } = self
            .policy
            .fetch_with_headers(url, headers, &NullObserver)
            .await?;
        ferret_debug!("fetched {} in {} attempt(s)", url, attempt_count);

        let decoded = decode_text(&output.bytes, output.metadata.content_type.as_deref());
        self.last_url = Some(output.metadata.final_url);
        self.last_html = Some(decoded.text);
        Ok(self.last_html.as_deref().unwrap_or_default())
    }

    /// Parsed view of the last fetched page.
    pub fn page(&self) -> Result<PageDocument, ScrapeError> {
        let html = self.last_html.as_deref().ok_or(ScrapeError::NotLoaded)?;
        Ok(PageDocument::parse(html))
    }

    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    pub fn last_html(&self) -> Option<&str> {
        self.last_html.as_deref()
    }
}
