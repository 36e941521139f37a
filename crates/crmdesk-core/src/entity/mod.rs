//! Business entities shown in the admin lists.
//!
//! Entities are read-only snapshots supplied by an external source. This
//! crate never creates, edits, or deletes them.

mod contact;
mod quote;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use contact::{Contact, ContactStatus};
pub use quote::{Priority, Quote, QuoteStatus};

use crate::Result;
use crate::search::Searchable;

/// A field that free-text search may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Contact name.
    Name,
    /// Contact email.
    Email,
    /// Contact company.
    Company,
    /// Quote client.
    Client,
    /// Quote service.
    Service,
    /// Quote identifier.
    Id,
}

impl SearchField {
    /// Field name as shown in column headers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Company => "company",
            Self::Client => "client",
            Self::Service => "service",
            Self::Id => "id",
        }
    }
}

/// Which list an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Address book.
    Contact,
    /// Quote requests.
    Quote,
}

impl EntityKind {
    /// Plural noun for list summaries.
    #[must_use]
    pub const fn plural(&self) -> &'static str {
        match self {
            Self::Contact => "contacts",
            Self::Quote => "quotes",
        }
    }
}

/// Any entity the panel can list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// A contact.
    Contact(Contact),
    /// A quote request.
    Quote(Quote),
}

impl Entity {
    /// The entity's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Contact(c) => &c.id,
            Self::Quote(q) => &q.id,
        }
    }

    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Contact(_) => EntityKind::Contact,
            Self::Quote(_) => EntityKind::Quote,
        }
    }

    /// Free-form tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Contact(c) => &c.tags,
            Self::Quote(q) => &q.tags,
        }
    }
}

impl Searchable for Entity {
    fn search_fields(&self) -> &'static [SearchField] {
        match self {
            Self::Contact(c) => c.search_fields(),
            Self::Quote(q) => q.search_fields(),
        }
    }

    fn field_text(&self, field: SearchField) -> Option<&str> {
        match self {
            Self::Contact(c) => c.field_text(field),
            Self::Quote(q) => q.field_text(field),
        }
    }
}

impl From<Contact> for Entity {
    fn from(contact: Contact) -> Self {
        Self::Contact(contact)
    }
}

impl From<Quote> for Entity {
    fn from(quote: Quote) -> Self {
        Self::Quote(quote)
    }
}

/// Contacts and quote requests as delivered by the entity source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Address book entries.
    #[serde(default)]
    pub contacts: Vec<Contact>,
    /// Quote requests.
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

impl EntitySnapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a required field is missing.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        let snapshot = Self::from_json(&contents)?;
        debug!(
            "Loaded {} contacts and {} quotes from {}",
            snapshot.contacts.len(),
            snapshot.quotes.len(),
            path.display()
        );
        Ok(snapshot)
    }
}
