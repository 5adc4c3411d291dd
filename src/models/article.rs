use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated long-form article. Revisions mutate it in place: content is
/// replaced, version increments, and newly supplied source ids are unioned
/// into `source_content_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    /// May reference content pieces that have since been deleted.
    pub source_content_ids: Vec<String>,
    /// The most recent generation/revision instructions.
    pub instructions: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(
        title: String,
        content: String,
        source_content_ids: Vec<String>,
        instructions: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            content,
            source_content_ids,
            instructions,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a revision: new body, bumped version, refreshed timestamp.
    /// Additional source ids are merged as a set; existing order is kept and
    /// duplicates collapse.
    pub fn revise(&mut self, content: String, instructions: String, additional_ids: &[String]) {
        self.content = content;
        self.instructions = instructions;
        self.version += 1;
        self.updated_at = Utc::now();
        for id in additional_ids {
            if !self.source_content_ids.contains(id) {
                self.source_content_ids.push(id.clone());
            }
        }
    }

    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
