use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use inkdraft::ai::ClaudeWriter;
use inkdraft::config::Config;
use inkdraft::dispatch::{handle, Collaborators, Invocation};
use inkdraft::extract::HttpExtractor;
use inkdraft::storage::FileStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments: an action name plus an optional JSON
    // input payload (read from stdin when "-" is given)
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: inkdraft <action> [input-json | -]");
        std::process::exit(2);
    }

    let action = args[1].clone();
    let input = match args.get(2).map(String::as_str) {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            serde_json::from_str(&buf).context("invalid input JSON on stdin")?
        }
        Some(raw) => serde_json::from_str(raw).context("invalid input JSON argument")?,
        None => serde_json::Value::Object(Default::default()),
    };

    // Load configuration and wire the file-backed storage
    let config = Arc::new(Config::load().context("failed to load configuration")?);
    let storage = FileStorage::new(Path::new(&config.data_dir).join("store"))
        .context("failed to open storage")?;

    let collaborators = Collaborators {
        storage: Some(Arc::new(storage)),
        config: config.clone(),
        extractor: Arc::new(HttpExtractor::new()),
        generator: Arc::new(ClaudeWriter::new(config)),
    };

    let envelope = handle(Invocation { action, input }, &collaborators).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
