use cardscan_config::Config;
use cardscan_core::{CardImage, CardScanner, persist};
use std::path::Path;
use tracing::info;

use super::FieldEdit;

/// Input parameters for the Scan command strategy.
#[derive(Debug, Clone)]
pub struct ScanInput {
    /// Image path, or a `data:` URL
    pub image: String,
    /// Optional model override
    pub model: Option<String>,
    /// Edits applied after extraction
    pub edits: Vec<FieldEdit>,
    /// Save the result to Airtable
    pub save: bool,
}

/// Strategy for scanning a card photo.
///
/// Sends the photo to the vision model, resolves the reply into a record,
/// applies edits, prints the record, and optionally saves it.
#[derive(Debug, Clone, Copy)]
pub struct ScanStrategy;

impl super::CommandStrategy for ScanStrategy {
    type Input = ScanInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        let image = if input.image.starts_with("data:") {
            CardImage::from_data_url(&input.image)?
        } else {
            CardImage::from_path(Path::new(&input.image))?
        };

        let model = input.model.or_else(|| Some(config.vision.model.clone()));
        let scanner = CardScanner::new(super::build_provider(&config)?).with_model(model);

        let outcome = scanner.scan(&image).await?;
        let mut card = outcome.card;
        super::apply_edits(&mut card, &input.edits);

        let record_id = if input.save {
            let sink = super::build_sink(&config)?;
            Some(persist(&sink, &card).await?)
        } else {
            info!("Not saving; pass --save to write the record to Airtable");
            None
        };

        super::print_record(
            &card,
            super::RecordOrigin::Extracted(outcome.source),
            record_id.as_deref(),
        )
    }
}
