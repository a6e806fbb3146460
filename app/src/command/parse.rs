//! Parse already-transcribed card text without calling the vision model.

use cardscan_core::{resolve_response, resolve_text};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Input parameters for the Parse command strategy.
#[derive(Debug, Clone)]
pub struct ParseInput {
    /// Text file to read; stdin when absent
    pub file: Option<PathBuf>,
    /// Skip the structured JSON attempt and use the text heuristics only
    pub heuristic: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseStrategy;

impl super::CommandStrategy for ParseStrategy {
    type Input = ParseInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let text = match input.file {
            Some(path) => {
                info!("Reading card text from {}", path.display());
                std::fs::read_to_string(&path)?
            }
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let resolved = if input.heuristic {
            resolve_text(&text)
        } else {
            resolve_response(&text)
        };

        super::print_record(
            &resolved.card,
            super::RecordOrigin::Extracted(resolved.source),
            None,
        )
    }
}
