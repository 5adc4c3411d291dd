mod article;
mod content;

pub use article::{Article, ArticleSummary};
pub use content::{ContentPiece, ContentSummary, InspirationType};
