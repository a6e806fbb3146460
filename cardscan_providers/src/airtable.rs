//! Airtable record sink.
//!
//! Each card becomes one row of the configured table. Column names are fixed
//! by the destination base, so the mapping below must match it exactly.

use anyhow::Context;
use async_trait::async_trait;
use cardscan_core::{BusinessCard, Field, RecordSink};
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_TABLE_NAME: &str = "CRM";

/// Destination column for each card field.
pub const COLUMNS: [(Field, &str); 9] = [
    (Field::Name, "Name"),
    (Field::Title, "Position"),
    (Field::Company, "Company"),
    (Field::Email, "Email"),
    (Field::Phone, "Contact No."),
    (Field::Address, "Address"),
    (Field::Website, "Website"),
    (Field::Industry, "Industry"),
    (Field::Notes, "Notes on Card"),
];

/// Row payload for a card. Missing fields are written as empty strings.
#[must_use]
pub fn airtable_fields(card: &BusinessCard) -> Map<String, Value> {
    COLUMNS
        .iter()
        .map(|(field, column)| {
            (
                (*column).to_string(),
                Value::String(card.get(*field).unwrap_or_default().to_string()),
            )
        })
        .collect()
}

/// Operator hint for common Airtable failures.
const fn failure_hint(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Some("Authentication failed - check your API key")
        }
        StatusCode::NOT_FOUND => Some("Base or table not found - check your Base ID and table name"),
        StatusCode::UNPROCESSABLE_ENTITY => {
            Some("Field name mismatch - check your table field names")
        }
        _ => None,
    }
}

pub struct AirtableSink {
    client: Client,
    api_key: String,
    base_id: String,
    table_name: String,
    base_url: String,
}

impl AirtableSink {
    pub fn new(api_key: String, base_id: String, table_name: Option<String>) -> Self {
        let table_name = table_name
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        info!("Creating AirtableSink for table {table_name}");
        Self {
            client: Client::new(),
            api_key,
            base_id,
            table_name,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// `{base_url}/{base_id}/{table}` with each segment percent-encoded.
    fn table_url(&self) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Airtable base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| anyhow::anyhow!("Airtable base URL cannot carry a path"))?
            .pop_if_empty()
            .push(&self.base_id)
            .push(&self.table_name);
        Ok(url)
    }

    async fn create_record(&self, card: &BusinessCard) -> anyhow::Result<String> {
        let fields = airtable_fields(card);
        debug!("Record data prepared: {}", serde_json::Value::Object(fields.clone()));

        let response = self
            .client
            .post(self.table_url()?)
            .bearer_auth(&self.api_key)
            .json(&json!({ "records": [{ "fields": fields }] }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Some(hint) = failure_hint(status) {
                error!("{hint}");
            }
            anyhow::bail!("Airtable returned {status}: {body}");
        }

        let created = response.json::<Value>().await?;
        let id = created["records"][0]["id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing record id"))?;
        Ok(id.to_string())
    }

    async fn fetch_one(&self) -> anyhow::Result<usize> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("maxRecords", "1");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(response["records"].as_array().map_or(0, Vec::len))
    }
}

#[async_trait]
impl RecordSink for AirtableSink {
    async fn save(&self, card: &BusinessCard) -> anyhow::Result<String> {
        info!("Saving card to Airtable table {}", self.table_name);

        let id = self.create_record(card).await.map_err(|e| {
            error!("Airtable save error: {e}");
            anyhow::anyhow!("Failed to save data to Airtable: {e}")
        })?;

        info!("Successfully saved to Airtable: {id}");
        Ok(id)
    }

    async fn test_connection(&self) -> bool {
        info!("Testing Airtable connection to table {}", self.table_name);
        match self.fetch_one().await {
            Ok(count) => {
                info!(
                    "Airtable connection test successful: {}",
                    if count > 0 { "found records" } else { "no records found" }
                );
                true
            }
            Err(e) => {
                warn!("Airtable connection test failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> AirtableSink {
        AirtableSink::new("pat-test".to_string(), "appXYZ".to_string(), None)
    }

    #[test]
    fn maps_every_column_with_empty_defaults() {
        let card = BusinessCard {
            name: Some("Jane Doe".to_string()),
            title: Some("CTO".to_string()),
            phone: Some("(415) 555-0100".to_string()),
            ..BusinessCard::default()
        };
        let fields = airtable_fields(&card);

        assert_eq!(fields.len(), 9);
        assert_eq!(fields["Name"], "Jane Doe");
        assert_eq!(fields["Position"], "CTO");
        assert_eq!(fields["Contact No."], "(415) 555-0100");
        assert_eq!(fields["Notes on Card"], "");
        assert_eq!(fields["Industry"], "");
    }

    #[test]
    fn blank_table_falls_back_to_default() {
        assert_eq!(sink().table_name(), "CRM");
        let custom =
            AirtableSink::new(String::new(), String::new(), Some("  ".to_string()));
        assert_eq!(custom.table_name(), DEFAULT_TABLE_NAME);
    }

    #[test]
    fn table_url_encodes_segments() {
        let sink = AirtableSink::new(
            "pat-test".to_string(),
            "appXYZ".to_string(),
            Some("Card Leads".to_string()),
        )
        .with_base_url("https://api.airtable.com/v0/".to_string());

        let url = sink.table_url().map(|u| u.to_string()).unwrap_or_default();
        assert_eq!(url, "https://api.airtable.com/v0/appXYZ/Card%20Leads");
    }

    #[test]
    fn hints_cover_auth_and_schema_errors() {
        assert!(failure_hint(StatusCode::UNAUTHORIZED).is_some());
        assert!(failure_hint(StatusCode::NOT_FOUND).is_some());
        assert!(failure_hint(StatusCode::UNPROCESSABLE_ENTITY).is_some());
        assert_eq!(failure_hint(StatusCode::INTERNAL_SERVER_ERROR), None);
    }

    #[tokio::test]
    async fn unreachable_base_fails_connection_test() {
        let sink = sink().with_base_url("http://127.0.0.1:9/v0".to_string());
        assert!(!sink.test_connection().await);

        let err = sink.save(&BusinessCard::default()).await.err();
        assert!(err.is_some_and(|e| e.to_string().starts_with("Failed to save data to Airtable")));
    }
}
