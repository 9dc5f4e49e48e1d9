use std::time::Duration;

use ferret_logging::ferret_warn;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::{FailureKind, FetchError, FetchEvent, FetchMetadata, FetchOutput, FetchResult};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound on transport attempts per logical fetch; clamped to >= 1.
    pub max_retries: u32,
    /// Politeness jitter range, sampled uniformly before the first attempt.
    pub delay_range: (Duration, Duration),
    pub respect_delay: bool,
    /// One backoff "time unit"; the wait after attempt `i` is `unit * 2^i`.
    pub backoff_unit: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: "ferret-scraper/0.1".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            delay_range: (Duration::from_millis(200), Duration::from_millis(1000)),
            respect_delay: true,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

/// Receives fetch lifecycle events so callers can watch the retry schedule.
pub trait FetchObserver: Send + Sync {
    fn emit(&self, event: FetchEvent);
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl FetchObserver for NullObserver {
    fn emit(&self, _event: FetchEvent) {}
}

/// A single-attempt GET transport.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_once(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_once(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<FetchOutput, FetchError> {
        let parsed = url::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .headers(build_header_map(headers)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Redirects are followed by the client; a 3xx that still surfaces here
        // carried no location to follow. Only 4xx/5xx count as failures.
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let bytes = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

        let metadata = FetchMetadata {
            origin_url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| FetchError::new(FailureKind::InvalidHeader, err.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| FetchError::new(FailureKind::InvalidHeader, err.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

/// Bounded-retry GET: one optional politeness sleep, then up to
/// `max_retries` transport attempts with powers-of-two backoff between them.
pub struct FetchPolicy<F: Fetcher = ReqwestFetcher> {
    settings: FetchSettings,
    transport: F,
}

impl FetchPolicy<ReqwestFetcher> {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let transport = ReqwestFetcher::new(&settings)?;
        Ok(Self {
            settings,
            transport,
        })
    }
}

impl<F: Fetcher> FetchPolicy<F> {
    pub fn with_transport(settings: FetchSettings, transport: F) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    pub async fn fetch(
        &self,
        url: &str,
        observer: &dyn FetchObserver,
    ) -> Result<FetchResult, FetchError> {
        self.fetch_with_headers(url, &[], observer).await
    }

    /// The error of the final attempt is surfaced verbatim; earlier errors
    /// only show up in the retry diagnostics.
    pub async fn fetch_with_headers(
        &self,
        url: &str,
        headers: &[(String, String)],
        observer: &dyn FetchObserver,
    ) -> Result<FetchResult, FetchError> {
        if self.settings.respect_delay {
            let wait = politeness_wait(self.settings.delay_range);
            if !wait.is_zero() {
                observer.emit(FetchEvent::PolitenessDelay { wait });
                tokio::time::sleep(wait).await;
            }
        }

        let max_retries = self.settings.max_retries.max(1);
        let mut attempt = 0u32;
        loop {
            observer.emit(FetchEvent::AttemptStarted { attempt });
            match self.transport.fetch_once(url, headers).await {
                Ok(output) => {
                    return Ok(FetchResult {
                        output,
                        attempt_count: attempt + 1,
                    });
                }
                Err(error) if attempt + 1 < max_retries => {
                    let wait = backoff_wait(self.settings.backoff_unit, attempt);
                    ferret_warn!(
                        "retry {} for {} -> {}; waiting {:?}",
                        attempt + 1,
                        url,
                        error,
                        wait
                    );
                    observer.emit(FetchEvent::RetryScheduled {
                        attempt,
                        wait,
                        error,
                    });
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn politeness_wait((min, max): (Duration, Duration)) -> Duration {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if min == max {
        return min;
    }
    let millis = rand::thread_rng().gen_range(min.as_millis() as u64..=max.as_millis() as u64);
    Duration::from_millis(millis)
}

fn backoff_wait(unit: Duration, attempt: u32) -> Duration {
    unit.saturating_mul(2u32.saturating_pow(attempt))
}
