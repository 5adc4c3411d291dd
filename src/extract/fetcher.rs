use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::InspirationType;

use super::page::parse_page;
use super::{ExtractedPage, Extractor, FeedItem};

const USER_AGENT_STRING: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// HTTP-backed extractor for feeds and single pages.
pub struct HttpExtractor {
    client: Client,
}

impl HttpExtractor {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Extraction(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for HttpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn classify(&self, url: &str) -> InspirationType {
        match self.fetch_bytes(url).await {
            Ok(bytes) => match parser::parse(&bytes[..]) {
                Ok(_) => InspirationType::Feed,
                Err(e) => {
                    tracing::debug!("{} is not a feed: {}", url, e);
                    InspirationType::Single
                }
            },
            Err(e) => {
                tracing::debug!("Fetch during classification of {} failed: {}", url, e);
                InspirationType::Single
            }
        }
    }

    async fn extract_single(&self, url: &str) -> Result<ExtractedPage> {
        let bytes = self.fetch_bytes(url).await?;
        let html = String::from_utf8_lossy(&bytes);
        Ok(parse_page(&html))
    }

    async fn extract_feed(&self, url: &str) -> Result<Vec<FeedItem>> {
        let bytes = self.fetch_bytes(url).await?;
        let feed = parser::parse(&bytes[..])?;
        let items = map_feed_entries(feed, url);
        tracing::debug!("Extracted {} items from {}", items.len(), url);
        Ok(items)
    }
}

/// Map parsed feed entries to items: title defaults to "Untitled", content is
/// the first of summary text or full content body (HTML converted to plain
/// text), and the link falls back to the feed URL itself.
fn map_feed_entries(feed: feed_rs::model::Feed, feed_url: &str) -> Vec<FeedItem> {
    feed.entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let content_html = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));

            let content = content_html
                .and_then(|html| html2text::from_read(html.as_bytes(), 80).ok())
                .map(|text| text.trim().to_string())
                .unwrap_or_default();

            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_else(|| feed_url.to_string());

            FeedItem {
                title,
                content,
                link,
            }
        })
        .collect()
}
