mod fetcher;
mod page;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::InspirationType;

pub use fetcher::HttpExtractor;
pub use page::parse_page;

/// Title and body text extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub content: String,
}

/// One entry extracted from a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub content: String,
    pub link: String,
}

/// Content acquisition port: classify a URL, then pull either one page or a
/// list of feed items out of it.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Classify by attempting a feed parse. Any failure, including network
    /// errors, falls back to single-page handling; a transient fetch error
    /// is indistinguishable from "not a feed" here.
    async fn classify(&self, url: &str) -> InspirationType;

    async fn extract_single(&self, url: &str) -> Result<ExtractedPage>;

    async fn extract_feed(&self, url: &str) -> Result<Vec<FeedItem>>;
}
