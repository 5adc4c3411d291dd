mod prompt;
mod writer;

pub use prompt::{creation_prompt, extract_title, revision_prompt, EDITOR_PERSONA, WRITER_PERSONA};
pub use writer::{ClaudeWriter, TextGenerator};
