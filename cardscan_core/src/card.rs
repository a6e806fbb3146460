//! Business card record types.
//!
//! A [`BusinessCard`] is the only entity in the system: nine optional text
//! slots filled by extraction and then edited by the caller before it is
//! handed to a sink. Absence is always `None`, never an empty string.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::normalize::normalize_text;

/// One named slot of a [`BusinessCard`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Field {
    Name = 0,
    Title = 1,
    Company = 2,
    Phone = 3,
    Email = 4,
    Website = 5,
    Address = 6,
    Industry = 7,
    Notes = 8,
}

impl Field {
    /// Every field in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Title,
        Self::Company,
        Self::Phone,
        Self::Email,
        Self::Website,
        Self::Address,
        Self::Industry,
        Self::Notes,
    ];

    /// Returns the string representation of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Company => "company",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Website => "website",
            Self::Address => "address",
            Self::Industry => "industry",
            Self::Notes => "notes",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "title" | "position" => Ok(Self::Title),
            "company" => Ok(Self::Company),
            "phone" | "contact_no" | "contact" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "website" => Ok(Self::Website),
            "address" => Ok(Self::Address),
            "industry" => Ok(Self::Industry),
            "notes" => Ok(Self::Notes),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}

/// Structured contents of one business card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "position")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "contact_no",
        alias = "contact"
    )]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl BusinessCard {
    /// Borrow the value of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Title => self.title.as_deref(),
            Field::Company => self.company.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Website => self.website.as_deref(),
            Field::Address => self.address.as_deref(),
            Field::Industry => self.industry.as_deref(),
            Field::Notes => self.notes.as_deref(),
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Title => &mut self.title,
            Field::Company => &mut self.company,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Website => &mut self.website,
            Field::Address => &mut self.address,
            Field::Industry => &mut self.industry,
            Field::Notes => &mut self.notes,
        };
        *slot = value;
    }

    /// Apply a user edit. A blank value clears the field.
    pub fn apply_edit(&mut self, field: Field, value: &str) {
        self.set(field, normalize_text(value));
    }

    /// True when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_none())
    }

    /// Iterate over populated fields in declaration order.
    pub fn present_fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_round_trips_through_str() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().ok(), Some(field));
        }
    }

    #[test]
    fn field_accepts_column_aliases() {
        assert_eq!("Position".parse::<Field>().ok(), Some(Field::Title));
        assert_eq!("contact_no".parse::<Field>().ok(), Some(Field::Phone));
        assert!(matches!(
            "fax".parse::<Field>(),
            Err(CoreError::UnknownField(f)) if f == "fax"
        ));
    }

    #[test]
    fn default_card_is_empty() {
        let card = BusinessCard::default();
        assert!(card.is_empty());
        assert_eq!(card.present_fields().count(), 0);
    }

    #[test]
    fn apply_edit_sets_and_clears() {
        let mut card = BusinessCard::default();
        card.apply_edit(Field::Company, "  Acme   Corp ");
        assert_eq!(card.get(Field::Company), Some("Acme Corp"));

        card.apply_edit(Field::Company, "   ");
        assert_eq!(card.company, None);
        assert!(card.is_empty());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let card = BusinessCard {
            email: Some("jane@acme.com".to_string()),
            ..BusinessCard::default()
        };
        let json = serde_json::to_value(&card).unwrap_or_default();
        assert_eq!(json, serde_json::json!({ "email": "jane@acme.com" }));
    }

    #[test]
    fn deserializes_position_alias() {
        let card: BusinessCard =
            serde_json::from_str(r#"{"name":"Jane Doe","position":"CTO","website":null}"#)
                .unwrap_or_default();
        assert_eq!(card.title.as_deref(), Some("CTO"));
        assert_eq!(card.name.as_deref(), Some("Jane Doe"));
        assert_eq!(card.website, None);
    }
}
