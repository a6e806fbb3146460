//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use cardscan_config::Config;
use cardscan_core::{BusinessCard, ExtractionSource, Field};
use cardscan_providers::{AirtableSink, OpenAiVisionProvider, RetryPolicy};
use serde_json::json;
use std::str::FromStr;
use tracing::info;

mod info;
mod init;
mod parse;
mod save;
mod scan;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use parse::{ParseInput, ParseStrategy};
pub use save::{SaveInput, SaveStrategy};
pub use scan::{ScanInput, ScanStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// A `field=value` edit applied to a record before it is printed or saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: Field,
    pub value: String,
}

impl FromStr for FieldEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected field=value, got '{s}'"))?;
        let field = Field::from_str(field).map_err(|e| e.to_string())?;
        Ok(Self {
            field,
            value: value.to_string(),
        })
    }
}

fn apply_edits(card: &mut BusinessCard, edits: &[FieldEdit]) {
    for edit in edits {
        info!("Editing {}: {:?}", edit.field, edit.value);
        card.apply_edit(edit.field, &edit.value);
    }
}

fn retry_policy(config: &Config) -> RetryPolicy {
    RetryPolicy::from_secs(
        &config.retry.base_delays_secs,
        config.retry.final_retries,
        config.retry.final_delay_secs,
    )
}

fn build_provider(config: &Config) -> anyhow::Result<OpenAiVisionProvider> {
    let mut provider = OpenAiVisionProvider::new(config.openai_api_key()?.to_string())
        .with_max_tokens(config.vision.max_tokens)
        .with_detail(config.vision.detail.clone())
        .with_retry(retry_policy(config));
    if let Some(base_url) = &config.providers.openai.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(provider)
}

fn build_sink(config: &Config) -> anyhow::Result<AirtableSink> {
    let (api_key, base_id, table_name) = config.airtable_credentials()?;
    Ok(AirtableSink::new(
        api_key.to_string(),
        base_id.to_string(),
        Some(table_name.to_string()),
    ))
}

/// Where a printed record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOrigin {
    Extracted(ExtractionSource),
    /// Loaded from a record file by `save`.
    File,
}

impl RecordOrigin {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Extracted(source) => source.as_str(),
            Self::File => "file",
        }
    }
}

fn record_json(
    card: &BusinessCard,
    origin: RecordOrigin,
    record_id: Option<&str>,
) -> serde_json::Value {
    json!({
        "source": origin.as_str(),
        "record": card,
        "record_id": record_id,
    })
}

/// Print a record as JSON on stdout. Logs go to stderr.
fn print_record(
    card: &BusinessCard,
    origin: RecordOrigin,
    record_id: Option<&str>,
) -> anyhow::Result<()> {
    let output = record_json(card, origin, record_id);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
