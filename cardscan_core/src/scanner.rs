//! Photo to record pipeline.

use async_trait::async_trait;
use tracing::info;

use crate::card::BusinessCard;
use crate::error::CoreError;
use crate::image::CardImage;
use crate::normalize::normalize;
use crate::structured::{ExtractionSource, resolve_response};

/// A vision-capable model that transcribes or structures a card photo.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn read_card(&self, image: &CardImage, model: &str) -> anyhow::Result<String>;
    fn get_default_model(&self) -> &str;
}

/// Destination for finished records. Returns the created record id.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn save(&self, card: &BusinessCard) -> anyhow::Result<String>;
    async fn test_connection(&self) -> bool;
}

/// Result of scanning one photo.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub card: BusinessCard,
    pub source: ExtractionSource,
    pub raw_response: String,
}

pub struct CardScanner<P>
where
    P: VisionProvider,
{
    provider: P,
    model: Option<String>,
}

impl<P> CardScanner<P>
where
    P: VisionProvider,
{
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Override the provider's default model.
    #[must_use]
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.get_default_model())
    }

    pub async fn scan(&self, image: &CardImage) -> anyhow::Result<ScanOutcome> {
        let model = self.model();
        info!(
            "Scanning card image: {} ({} bytes) with model={model}",
            image.mime_type,
            image.data.len()
        );

        let raw_response = self.provider.read_card(image, model).await?;
        if raw_response.trim().is_empty() {
            return Err(CoreError::EmptyResponse.into());
        }

        let resolved = resolve_response(&raw_response);
        info!(
            "Card resolved via {} path: {} fields",
            resolved.source.as_str(),
            resolved.card.present_fields().count()
        );

        Ok(ScanOutcome {
            card: resolved.card,
            source: resolved.source,
            raw_response,
        })
    }
}

/// Normalize a record and hand it to a sink.
///
/// A record without a name is rejected before the sink is called.
pub async fn persist<S>(sink: &S, card: &BusinessCard) -> anyhow::Result<String>
where
    S: RecordSink + ?Sized,
{
    let card = normalize(card);
    if card.name.is_none() {
        return Err(CoreError::MissingName.into());
    }
    let id = sink.save(&card).await?;
    info!("Saved card record {id}");
    Ok(id)
}
