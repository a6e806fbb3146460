//! Parsing of the vision model's structured reply.
//!
//! The model is asked for a JSON object, but replies may be wrapped in a
//! Markdown fence, prefixed with prose, or be plain transcribed text. A reply
//! that cannot be read as a JSON object falls back to [`extract_fields`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::card::BusinessCard;
use crate::error::{CoreError, Result};
use crate::extract::extract_fields;
use crate::industry::canonical_industry;
use crate::normalize::{changed_fields, normalize};

/// Which path produced a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    /// The model returned a parseable JSON object.
    Structured,
    /// The reply was treated as raw text and parsed heuristically.
    Heuristic,
}

impl ExtractionSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Heuristic => "heuristic",
        }
    }
}

/// A normalized record together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub card: BusinessCard,
    pub source: ExtractionSource,
}

/// Strip an optional Markdown code fence around the reply.
fn strip_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a model reply as a JSON business card object.
pub fn parse_structured(response: &str) -> Result<BusinessCard> {
    let body = strip_fence(response);
    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err(CoreError::MalformedResponse(
            "no JSON object in response".to_string(),
        ));
    };
    if end < start {
        return Err(CoreError::MalformedResponse(
            "unbalanced JSON object".to_string(),
        ));
    }

    serde_json::from_str(&body[start..=end])
        .map_err(|e| CoreError::MalformedResponse(e.to_string()))
}

/// Turn a model reply into a normalized record.
///
/// Never fails: an unparseable reply is handled by the heuristic extractor.
#[must_use]
pub fn resolve_response(response: &str) -> Resolved {
    let (raw, source) = match parse_structured(response) {
        Ok(mut card) => {
            if let Some(label) = card.industry.as_deref().and_then(canonical_industry) {
                card.industry = Some(label.to_string());
            }
            (card, ExtractionSource::Structured)
        }
        Err(e) => {
            warn!("Structured parse failed, falling back to text heuristics: {e}");
            (extract_fields(response), ExtractionSource::Heuristic)
        }
    };

    let card = normalize(&raw);
    let changed = changed_fields(&raw, &card);
    if !changed.is_empty() {
        debug!("Normalization adjusted fields: {changed:?}");
    }

    Resolved { card, source }
}

/// Resolve raw text with the heuristic extractor only.
#[must_use]
pub fn resolve_text(text: &str) -> Resolved {
    Resolved {
        card: normalize(&extract_fields(text)),
        source: ExtractionSource::Heuristic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let card = parse_structured(r#"{"name": "Jane Doe", "email": "jane@acme.com"}"#);
        assert!(matches!(card, Ok(c) if c.name.as_deref() == Some("Jane Doe")));
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let reply = "```json\nHere you go: {\"company\": \"Acme Corp\", \"phone\": null}\n```";
        let card = parse_structured(reply).unwrap_or_default();
        assert_eq!(card.company.as_deref(), Some("Acme Corp"));
        assert_eq!(card.phone, None);
    }

    #[test]
    fn rejects_text_without_object() {
        assert!(matches!(
            parse_structured("Jane Doe\nAcme Corp"),
            Err(CoreError::MalformedResponse(_))
        ));
        assert!(parse_structured("} nope {").is_err());
        assert!(parse_structured(r#"{"name": 42}"#).is_err());
    }

    #[test]
    fn structured_reply_is_normalized_and_industry_coerced() {
        let resolved = resolve_response(
            r#"{"name": "  Jane   Doe ", "title": "", "industry": "software house"}"#,
        );
        assert_eq!(resolved.source, ExtractionSource::Structured);
        assert_eq!(resolved.card.name.as_deref(), Some("Jane Doe"));
        assert_eq!(resolved.card.title, None);
        assert_eq!(
            resolved.card.industry.as_deref(),
            Some("Technology & Software")
        );
    }

    #[test]
    fn structured_industry_names_survive_coercion() {
        for (value, expected) in [
            ("Hospitality", "Hospitality & Leisure"),
            ("Utilities", "Energy & Utilities"),
            ("Nonprofit", "Government & Nonprofit"),
            ("Hospitality & Leisure industry", "Hospitality & Leisure"),
        ] {
            let reply = serde_json::json!({ "name": "Jane Doe", "industry": value });
            let resolved = resolve_response(&reply.to_string());
            assert_eq!(resolved.source, ExtractionSource::Structured);
            assert_eq!(resolved.card.industry.as_deref(), Some(expected), "{value}");
        }
    }

    #[test]
    fn unknown_industry_is_kept() {
        let resolved = resolve_response(r#"{"industry": "Mining"}"#);
        assert_eq!(resolved.card.industry.as_deref(), Some("Mining"));
    }

    #[test]
    fn raw_text_falls_back_to_heuristics() {
        let resolved = resolve_response("Jane Doe\njane@acme.com");
        assert_eq!(resolved.source, ExtractionSource::Heuristic);
        assert_eq!(resolved.card.name.as_deref(), Some("Jane Doe"));
        assert_eq!(resolved.card.email.as_deref(), Some("jane@acme.com"));
    }
}
