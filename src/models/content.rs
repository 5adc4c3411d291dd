use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a content piece entered the collection: a single saved page or one
/// item out of an RSS/Atom feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspirationType {
    Single,
    Feed,
}

impl InspirationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspirationType::Single => "single",
            InspirationType::Feed => "feed",
        }
    }
}

/// One unit of extracted text with provenance metadata. Immutable after
/// creation except for deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPiece {
    pub id: String,
    pub title: String,
    pub source: String,
    pub content: String,
    pub tags: Vec<String>,
    pub added_at: DateTime<Utc>,
    pub inspiration_type: InspirationType,
}

impl ContentPiece {
    pub fn new(
        title: String,
        source: String,
        content: String,
        tags: Vec<String>,
        inspiration_type: InspirationType,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            source,
            content,
            tags,
            added_at: Utc::now(),
            inspiration_type,
        }
    }

    /// Listing view: everything except the (potentially large) body text.
    pub fn summary(&self) -> ContentSummary {
        ContentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            source: self.source.clone(),
            tags: self.tags.clone(),
            added_at: self.added_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: String,
    pub title: String,
    pub source: String,
    pub tags: Vec<String>,
    pub added_at: DateTime<Utc>,
}
