//! Ferret web: polite fetching, page dissection, and HTML injection.
mod decode;
mod fetch;
mod inject;
mod query;
mod session;
mod types;

pub use decode::{decode_text, DecodedText};
pub use fetch::{FetchObserver, FetchPolicy, FetchSettings, Fetcher, NullObserver, ReqwestFetcher};
pub use inject::{inject_css, inject_html, Placement};
pub use query::{Interaction, InteractionKind, PageDocument};
pub use session::Scraper;
pub use types::{
    FailureKind, FetchError, FetchEvent, FetchMetadata, FetchOutput, FetchResult, ScrapeError,
};
