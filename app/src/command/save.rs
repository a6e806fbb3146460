use cardscan_config::Config;
use cardscan_core::{BusinessCard, normalize, persist};
use std::path::PathBuf;
use tracing::info;

use super::FieldEdit;

/// Input parameters for the Save command strategy.
#[derive(Debug, Clone)]
pub struct SaveInput {
    /// JSON file holding one record
    pub record: PathBuf,
    /// Edits applied before saving
    pub edits: Vec<FieldEdit>,
}

/// Strategy for saving an edited record to Airtable.
#[derive(Debug, Clone, Copy)]
pub struct SaveStrategy;

impl super::CommandStrategy for SaveStrategy {
    type Input = SaveInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        info!("Loading record from {}", input.record.display());
        let content = std::fs::read_to_string(&input.record)?;
        let mut card: BusinessCard = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid record file: {e}"))?;
        super::apply_edits(&mut card, &input.edits);
        let card = normalize(&card);

        let sink = super::build_sink(&config)?;
        let record_id = persist(&sink, &card).await?;

        super::print_record(&card, super::RecordOrigin::File, Some(&record_id))
    }
}
