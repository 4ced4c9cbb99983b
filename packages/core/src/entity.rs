//! Entity domain types: the validated record managed by the entity service.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::ValidationError;

/// Resource name used in lookup errors.
pub const RESOURCE: &str = "entity";

/// Unique identifier for an entity, assigned by the repository on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Ulid);

impl EntityId {
    /// Create a new unique entity ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse an entity ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    #[default]
    Pending,
    Active,
    Inactive,
    Suspended,
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityStatus::Pending => write!(f, "pending"),
            EntityStatus::Active => write!(f, "active"),
            EntityStatus::Inactive => write!(f, "inactive"),
            EntityStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// Postal address owned by a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[garde(allow_unvalidated)]
pub struct Address {
    #[garde(length(min = 1))]
    pub street: String,
    #[garde(length(min = 1))]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[garde(length(min = 1))]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: None,
            postal_code: postal_code.into(),
            country: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// A validated domain record.
///
/// Field order matters: validation reports the first failing field in
/// declaration order (name, contact, age, address).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[garde(allow_unvalidated)]
pub struct Entity {
    /// Identity, absent until the repository assigns one.
    pub id: Option<EntityId>,
    /// Display name.
    #[garde(length(min = 3))]
    pub name: String,
    /// Contact email address.
    #[garde(pattern(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"))]
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(range(min = 0, max = 150))]
    pub age: Option<i32>,
    pub status: EntityStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(dive)]
    pub address: Option<Address>,
    /// Unique tags in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form metadata, last write wins.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// When the entity was constructed.
    pub created_at: DateTime<Utc>,
    /// When the entity was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Entity {
    /// Create a new pending entity with no tags or metadata.
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            contact: contact.into(),
            first_name: None,
            last_name: None,
            age: None,
            status: EntityStatus::Pending,
            address: None,
            tags: Vec::new(),
            metadata: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set first and last name.
    pub fn with_names(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Set the age.
    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    /// Attach an address.
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Stamp the modification time. Never moves it before `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at).max(self.updated_at);
    }

    /// Change the status.
    pub fn set_status(&mut self, status: EntityStatus) {
        self.status = status;
        self.touch();
    }

    /// Replace or clear the address.
    pub fn set_address(&mut self, address: Option<Address>) {
        self.address = address;
        self.touch();
    }

    /// Add a tag. Returns false if it was already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.has_tag(&tag) {
            return false;
        }
        self.tags.push(tag);
        self.touch();
        true
    }

    /// Remove a tag. Returns false if it was not present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Set a metadata entry, overwriting any previous value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.into(), value.into());
        self.touch();
    }

    pub fn metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    /// First and last name, falling back to the display name.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        let full = format!("{} {}", first, last);
        let full = full.trim();
        if full.is_empty() {
            self.name.clone()
        } else {
            full.to_string()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EntityStatus::Active
    }
}

/// Validate an entity, reporting the first failing field.
///
/// Pure: the entity is never modified.
pub fn validate(entity: &Entity) -> Result<(), ValidationError> {
    entity.validate().map_err(|report| {
        report
            .iter()
            .next()
            .map(|(path, error)| ValidationError::new(path.to_string(), error.message()))
            .unwrap_or_else(|| ValidationError::new(RESOURCE, "invalid entity"))
    })
}
