//! Contact model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SearchField;
use crate::search::Searchable;

/// Relationship status of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContactStatus {
    /// Currently doing business with us.
    #[default]
    Active,
    /// No recent activity.
    Inactive,
    /// Potential customer, not yet converted.
    Prospect,
    /// Any value the entity source sent that we don't recognize.
    Other(String),
}

impl ContactStatus {
    /// Parse from the wire representation. Matching is exact.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "prospect" => Self::Prospect,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Convert to the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Prospect => "prospect",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ContactStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ContactStatus> for String {
    fn from(status: ContactStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person in the address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number, free-form.
    #[serde(default)]
    pub phone: String,
    /// Company the contact works for.
    pub company: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Relationship status.
    pub status: ContactStatus,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Date of the most recent interaction.
    pub last_contact: NaiveDate,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Contact {
    /// Fields searched by the contact list, in match order.
    pub const SEARCH_FIELDS: &'static [SearchField] =
        &[SearchField::Name, SearchField::Email, SearchField::Company];

    /// Creates a new active contact with no tags.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        company: impl Into<String>,
        last_contact: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            company: company.into(),
            position: String::new(),
            status: ContactStatus::Active,
            tags: Vec::new(),
            last_contact,
            avatar: None,
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: ContactStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Initials for the avatar fallback ("John Smith" -> "JS").
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl Searchable for Contact {
    fn search_fields(&self) -> &'static [SearchField] {
        Self::SEARCH_FIELDS
    }

    fn field_text(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Name => Some(&self.name),
            SearchField::Email => Some(&self.email),
            SearchField::Company => Some(&self.company),
            SearchField::Client | SearchField::Service | SearchField::Id => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ContactStatus::Active,
            ContactStatus::Inactive,
            ContactStatus::Prospect,
        ] {
            assert_eq!(ContactStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_status_unknown_is_preserved() {
        let status = ContactStatus::parse("archived");
        assert_eq!(status, ContactStatus::Other("archived".to_string()));
        assert_eq!(status.as_str(), "archived");
    }

    #[test]
    fn test_status_parse_is_exact() {
        assert_eq!(
            ContactStatus::parse("PROSPECT"),
            ContactStatus::Other("PROSPECT".to_string())
        );
        assert_eq!(
            ContactStatus::parse(" active"),
            ContactStatus::Other(" active".to_string())
        );
    }

    #[test]
    fn test_status_keeps_spelling_through_json() {
        let status: ContactStatus = serde_json::from_str(r#""ACTIVE""#).unwrap();
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""ACTIVE""#);
    }

    #[test]
    fn test_initials() {
        let contact = Contact::new("1", "John Smith", "john@acme.com", "Acme", date());
        assert_eq!(contact.initials(), "JS");
    }

    #[test]
    fn test_field_text_only_for_contact_fields() {
        let contact = Contact::new("1", "John Smith", "john@acme.com", "Acme", date());
        assert_eq!(contact.field_text(SearchField::Company), Some("Acme"));
        assert_eq!(contact.field_text(SearchField::Service), None);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "id": "1",
            "name": "John Smith",
            "email": "john.smith@acme.com",
            "phone": "+1 (555) 123-4567",
            "company": "Acme Corporation",
            "position": "CEO",
            "status": "active",
            "tags": ["VIP", "Enterprise"],
            "lastContact": "2024-01-15"
        }"#;

        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.status, ContactStatus::Active);
        assert_eq!(contact.tags, vec!["VIP", "Enterprise"]);
        assert_eq!(contact.last_contact, date());
        assert!(contact.avatar.is_none());
    }
}
