use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ai::{
    creation_prompt, extract_title, revision_prompt, TextGenerator, EDITOR_PERSONA, WRITER_PERSONA,
};
use crate::config::ConfigSource;
use crate::error::Result;
use crate::extract::Extractor;
use crate::models::{Article, ContentPiece, InspirationType};
use crate::repository::Repository;
use crate::storage::Storage;

const DEFAULT_PAGE_SIZE: usize = 20;

/// What the host hands us per invocation: an action name plus a free-form
/// input payload.
#[derive(Debug, Deserialize)]
pub struct Invocation {
    pub action: String,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Structured display data for UI rendering.
    Template,
    /// Raw content delivered verbatim to the end user.
    Passthrough,
}

/// Normalized result envelope returned to the host for every invocation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub response_mode: ResponseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_content: Option<Value>,
}

impl Envelope {
    fn template(agent_data: Value) -> Self {
        Self {
            response_mode: ResponseMode::Template,
            agent_data: Some(agent_data),
            user_content: None,
        }
    }

    fn passthrough(agent_data: Value, content: String) -> Self {
        Self {
            response_mode: ResponseMode::Passthrough,
            agent_data: Some(agent_data),
            user_content: Some(json!({ "content": content })),
        }
    }

    fn template_error(message: String) -> Self {
        Self::template(json!({ "template": "error", "message": message }))
    }

    fn passthrough_error(message: String) -> Self {
        Self::passthrough(
            json!({ "template": "error", "message": message }),
            message.clone(),
        )
    }
}

/// The external collaborators every invocation runs against. Storage is the
/// one hard requirement; its absence fails the invocation up front.
pub struct Collaborators {
    pub storage: Option<Arc<dyn Storage>>,
    pub config: Arc<dyn ConfigSource>,
    pub extractor: Arc<dyn Extractor>,
    pub generator: Arc<dyn TextGenerator>,
}

/// Single entry point. Dispatches on the action name; every handler failure
/// is caught here and normalized into the action's fixed envelope mode, so
/// no error crosses the invocation boundary.
pub async fn handle(invocation: Invocation, collaborators: &Collaborators) -> Envelope {
    let Some(storage) = collaborators.storage.as_ref() else {
        return Envelope::template_error("Storage is required".to_string());
    };
    let repo = Repository::new(Arc::clone(storage));
    let input = invocation.input;

    match invocation.action.as_str() {
        "addInspiration" => {
            add_inspiration(&repo, collaborators.extractor.as_ref(), input)
                .await
                .unwrap_or_else(|e| {
                    Envelope::template(json!({
                        "template": "error",
                        "message": e.to_string(),
                        "contentCount": 0,
                    }))
                })
        }
        "listContent" => list_content(&repo, input)
            .await
            .unwrap_or_else(|e| Envelope::template_error(e.to_string())),
        "getContent" => get_content(&repo, input)
            .await
            .unwrap_or_else(|e| Envelope::passthrough_error(e.to_string())),
        "createArticle" => create_article(&repo, collaborators.generator.as_ref(), input)
            .await
            .unwrap_or_else(|e| Envelope::passthrough_error(e.to_string())),
        "listArticles" => list_articles(&repo, input)
            .await
            .unwrap_or_else(|e| Envelope::template_error(e.to_string())),
        "updateArticle" => update_article(&repo, collaborators.generator.as_ref(), input)
            .await
            .unwrap_or_else(|e| Envelope::passthrough_error(e.to_string())),
        "deleteContent" => delete_content(&repo, input)
            .await
            .unwrap_or_else(|e| Envelope::template_error(e.to_string())),
        other => Envelope::template_error(format!("Unknown action: {}", other)),
    }
}

fn default_limit() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
struct AddInspirationInput {
    url: String,
    #[serde(default)]
    tags: Vec<String>,
}

async fn add_inspiration(
    repo: &Repository,
    extractor: &dyn Extractor,
    input: Value,
) -> Result<Envelope> {
    let input: AddInspirationInput = serde_json::from_value(input)?;

    url::Url::parse(&input.url)
        .map_err(|e| crate::error::AppError::Extraction(format!("Invalid URL: {}", e)))?;

    match extractor.classify(&input.url).await {
        InspirationType::Feed => {
            let items = extractor.extract_feed(&input.url).await?;
            let count = items.len();
            // Sequential writes; a failure partway leaves earlier pieces in
            // place (no rollback).
            for item in items {
                let piece = ContentPiece::new(
                    item.title,
                    item.link,
                    item.content,
                    input.tags.clone(),
                    InspirationType::Feed,
                );
                repo.contents.put(&piece.id, &piece).await?;
            }
            tracing::debug!("Added {} feed items from {}", count, input.url);
            Ok(Envelope::template(json!({
                "template": "success",
                "type": InspirationType::Feed.as_str(),
                "contentCount": count,
            })))
        }
        InspirationType::Single => {
            let page = extractor.extract_single(&input.url).await?;
            let piece = ContentPiece::new(
                page.title,
                input.url.clone(),
                page.content,
                input.tags,
                InspirationType::Single,
            );
            repo.contents.put(&piece.id, &piece).await?;
            tracing::debug!("Added single page {}", input.url);
            Ok(Envelope::template(json!({
                "template": "success",
                "type": InspirationType::Single.as_str(),
                "contentCount": 1,
            })))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListContentInput {
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_content(repo: &Repository, input: Value) -> Result<Envelope> {
    let input: ListContentInput = serde_json::from_value(input)?;

    if repo.contents.index().await?.is_empty() {
        return Ok(Envelope::template(json!({
            "template": "empty",
            "totalCount": 0,
            "returnedCount": 0,
        })));
    }

    let mut pieces = repo.contents.list_all().await?;

    // Tag filter is a logical OR: keep pieces sharing at least one tag.
    if !input.tags.is_empty() {
        pieces.retain(|piece| piece.tags.iter().any(|tag| input.tags.contains(tag)));
    }

    pieces.sort_by(|a, b| b.added_at.cmp(&a.added_at));

    let total_count = pieces.len();
    let page: Vec<_> = pieces
        .iter()
        .skip(input.offset)
        .take(input.limit)
        .map(|piece| piece.summary())
        .collect();

    Ok(Envelope::template(json!({
        "template": "success",
        "totalCount": total_count,
        "returnedCount": page.len(),
        "content": page,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetContentInput {
    content_id: String,
}

async fn get_content(repo: &Repository, input: Value) -> Result<Envelope> {
    let input: GetContentInput = serde_json::from_value(input)?;

    let Some(piece) = repo.contents.get(&input.content_id).await? else {
        return Ok(Envelope::passthrough_error(format!(
            "Content not found: {}",
            input.content_id
        )));
    };

    let tags = if piece.tags.is_empty() {
        "none".to_string()
    } else {
        piece.tags.join(", ")
    };
    let formatted = format!(
        "# {}\n\nSource: {}\nTags: {}\nAdded: {}\n\n{}",
        piece.title,
        piece.source,
        tags,
        piece.added_at.to_rfc3339(),
        piece.content
    );

    Ok(Envelope::passthrough(
        serde_json::to_value(piece.summary())?,
        formatted,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArticleInput {
    content_ids: Vec<String>,
    instructions: String,
    title: Option<String>,
}

async fn create_article(
    repo: &Repository,
    generator: &dyn TextGenerator,
    input: Value,
) -> Result<Envelope> {
    let input: CreateArticleInput = serde_json::from_value(input)?;

    let pieces = resolve_pieces(repo, &input.content_ids).await?;
    if pieces.is_empty() {
        return Ok(Envelope::passthrough_error(
            "No valid content pieces found".to_string(),
        ));
    }

    let prompt = creation_prompt(&pieces, &input.instructions, input.title.as_deref());
    let output = generator.generate(WRITER_PERSONA, &prompt).await?;

    let title = extract_title(&output, input.title.as_deref());
    let source_ids = pieces.iter().map(|p| p.id.clone()).collect();
    let article = Article::new(title, output, source_ids, input.instructions);
    repo.articles.put(&article.id, &article).await?;

    Ok(Envelope::passthrough(
        json!({
            "template": "success",
            "articleId": article.id,
            "title": article.title,
            "version": article.version,
        }),
        article.content,
    ))
}

#[derive(Debug, Deserialize)]
struct ListArticlesInput {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default)]
    offset: usize,
}

async fn list_articles(repo: &Repository, input: Value) -> Result<Envelope> {
    let input: ListArticlesInput = serde_json::from_value(input)?;

    if repo.articles.index().await?.is_empty() {
        return Ok(Envelope::template(json!({
            "template": "empty",
            "totalCount": 0,
            "returnedCount": 0,
        })));
    }

    let mut articles = repo.articles.list_all().await?;
    articles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let total_count = articles.len();
    let page: Vec<_> = articles
        .iter()
        .skip(input.offset)
        .take(input.limit)
        .map(|article| article.summary())
        .collect();

    Ok(Envelope::template(json!({
        "template": "success",
        "totalCount": total_count,
        "returnedCount": page.len(),
        "articles": page,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArticleInput {
    article_id: String,
    instructions: String,
    #[serde(default)]
    additional_content_ids: Vec<String>,
}

async fn update_article(
    repo: &Repository,
    generator: &dyn TextGenerator,
    input: Value,
) -> Result<Envelope> {
    let input: UpdateArticleInput = serde_json::from_value(input)?;

    let Some(mut article) = repo.articles.get(&input.article_id).await? else {
        return Ok(Envelope::passthrough_error(format!(
            "Article not found: {}",
            input.article_id
        )));
    };

    let additional = resolve_pieces(repo, &input.additional_content_ids).await?;
    let additional_ids: Vec<String> = additional.iter().map(|p| p.id.clone()).collect();

    let prompt = revision_prompt(&article, &input.instructions, &additional);
    let output = generator.generate(EDITOR_PERSONA, &prompt).await?;

    article.revise(output, input.instructions, &additional_ids);
    repo.articles.put(&article.id, &article).await?;

    Ok(Envelope::passthrough(
        json!({
            "template": "success",
            "articleId": article.id,
            "title": article.title,
            "version": article.version,
        }),
        article.content,
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteContentInput {
    content_id: String,
}

async fn delete_content(repo: &Repository, input: Value) -> Result<Envelope> {
    let input: DeleteContentInput = serde_json::from_value(input)?;

    let removed = repo.contents.delete(&input.content_id).await?;
    let template = if removed { "success" } else { "notFound" };

    Ok(Envelope::template(json!({
        "template": template,
        "contentId": input.content_id,
    })))
}

/// Resolve content ids to pieces, silently skipping ids with no record.
async fn resolve_pieces(repo: &Repository, ids: &[String]) -> Result<Vec<ContentPiece>> {
    let mut pieces = Vec::with_capacity(ids.len());
    for id in ids {
        match repo.contents.get(id).await? {
            Some(piece) => pieces.push(piece),
            None => tracing::debug!("Skipping missing content piece {}", id),
        }
    }
    Ok(pieces)
}
