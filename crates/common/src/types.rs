use serde::{Deserialize, Serialize};

/// Stable identifier of a business entity.
///
/// The same identifier joins the business entity, its modelling record
/// and the records held by each dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Anything that exposes a stable [`EntityId`].
pub trait Identifiable {
    fn id(&self) -> &EntityId;
}

impl Identifiable for EntityId {
    fn id(&self) -> &EntityId {
        self
    }
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> &EntityId {
        (**self).id()
    }
}

/// A customer, the business entity created across both dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerEntity {
    id: EntityId,
}

impl CustomerEntity {
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self { id: id.into() }
    }
}

impl Identifiable for CustomerEntity {
    fn id(&self) -> &EntityId {
        &self.id
    }
}
