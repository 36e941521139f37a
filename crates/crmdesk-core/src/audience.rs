//! Newsletter recipient groups.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A named group of recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    /// Identifier used by the compose form.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of recipients in the group.
    pub count: u64,
}

impl Audience {
    /// Creates a new audience.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, count: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
        }
    }
}

/// Ordered, read-only list of audiences with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AudienceRegistry {
    audiences: Vec<Audience>,
}

impl AudienceRegistry {
    /// Builds a registry, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAudience`] if two audiences share an id.
    pub fn new(audiences: Vec<Audience>) -> Result<Self> {
        let mut seen = HashSet::new();
        for audience in &audiences {
            if !seen.insert(audience.id.as_str()) {
                return Err(Error::DuplicateAudience(audience.id.clone()));
            }
        }
        Ok(Self { audiences })
    }

    /// The default recipient groups.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            audiences: vec![
                Audience::new("all", "All Contacts", 2847),
                Audience::new("active", "Active Customers", 1843),
                Audience::new("prospects", "Prospects", 542),
                Audience::new("vip", "VIP Clients", 89),
            ],
        }
    }

    /// Looks up an audience by id. `None` means no valid audience is selected.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&Audience> {
        self.audiences.iter().find(|audience| audience.id == id)
    }

    /// All audiences in registry order.
    #[must_use]
    pub fn audiences(&self) -> &[Audience] {
        &self.audiences
    }

    /// Number of audiences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.audiences.len()
    }

    /// Returns true if the registry has no audiences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.audiences.is_empty()
    }
}

impl Default for AudienceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'de> Deserialize<'de> for AudienceRegistry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let audiences = Vec::<Audience>::deserialize(deserializer)?;
        Self::new(audiences).map_err(serde::de::Error::custom)
    }
}
