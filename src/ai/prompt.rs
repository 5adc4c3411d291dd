use crate::models::{Article, ContentPiece};

pub const WRITER_PERSONA: &str = r#"You are a skilled long-form writer.
Synthesize the provided source material into a single coherent article.
Preserve the tone and voice of the source material where possible.
Write in markdown."#;

pub const EDITOR_PERSONA: &str = r#"You are a careful editor revising an existing article.
Apply the requested changes while keeping the article's tone and structure intact.
Return the complete revised article in markdown, not a diff or commentary."#;

// Keep prompts bounded; very long sources add little beyond this.
const MAX_SOURCE_CHARS: usize = 10000;

fn source_block(piece: &ContentPiece) -> String {
    let body = if piece.content.len() > MAX_SOURCE_CHARS {
        let mut end = MAX_SOURCE_CHARS;
        while !piece.content.is_char_boundary(end) {
            end -= 1;
        }
        &piece.content[..end]
    } else {
        &piece.content
    };

    format!("## {}\nSource: {}\n\n{}", piece.title, piece.source, body)
}

/// Build the prompt for first-time article synthesis: one block per source
/// piece separated by horizontal rules, then the instructions, then either
/// the requested title or a request to invent one.
pub fn creation_prompt(pieces: &[ContentPiece], instructions: &str, title: Option<&str>) -> String {
    let sources = pieces
        .iter()
        .map(source_block)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let title_request = match title {
        Some(title) => format!("Title the article: {}", title),
        None => "Invent a fitting title and put it on the first line as a markdown H1 (# Title)."
            .to_string(),
    };

    format!(
        "Write a long-form article based on the following source material.\n\n\
         {}\n\n---\n\nInstructions: {}\n\n{}",
        sources, instructions, title_request
    )
}

/// Build the prompt for revising an existing article. Additional source
/// pieces, when present, are appended as blocks after the instructions.
pub fn revision_prompt(article: &Article, instructions: &str, additional: &[ContentPiece]) -> String {
    let mut prompt = format!(
        "Revise the following article.\n\n# {}\n\n{}\n\n---\n\nRevision instructions: {}",
        article.title, article.content, instructions
    );

    if !additional.is_empty() {
        let sources = additional
            .iter()
            .map(source_block)
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");
        prompt.push_str(&format!(
            "\n\nIncorporate the following additional source material:\n\n{}",
            sources
        ));
    }

    prompt
}

/// Pick the article title: an explicitly requested title wins, else the
/// first markdown H1 heading at the start of a line in the model output,
/// else a fixed fallback.
pub fn extract_title(output: &str, requested: Option<&str>) -> String {
    if let Some(title) = requested {
        return title.to_string();
    }

    output
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|heading| heading.trim().to_string())
        .filter(|heading| !heading.is_empty())
        .unwrap_or_else(|| "Untitled Article".to_string())
}
