//! Managed-store addressing.
//!
//! Address format: `collection/id`
//!
//! The pair is opaque at this layer. Character sets are the backend's
//! business; the only thing checked here is that neither half is empty.

use std::fmt;
use std::str::FromStr;

/// Identifies one document in the managed store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentAddress {
    collection: String,
    id: String,
}

impl DocumentAddress {
    /// Create a new address. Values are kept exactly as given.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// The collection (e.g., "boards").
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The document id within the collection (e.g., "project-1").
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Check that both halves are present.
    pub fn validate(&self) -> Result<(), AddressError> {
        if self.collection.is_empty() {
            return Err(AddressError::EmptyCollection);
        }
        if self.id.is_empty() {
            return Err(AddressError::EmptyId);
        }
        Ok(())
    }
}

impl fmt::Display for DocumentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

impl FromStr for DocumentAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (collection, id) = s
            .split_once('/')
            .ok_or_else(|| AddressError::MissingSlash(s.to_string()))?;

        let address = Self::new(collection, id);
        address.validate()?;
        Ok(address)
    }
}

/// Error building or parsing a document address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("document address must contain '/' separator, got: {0}")]
    MissingSlash(String),
    #[error("collection name cannot be empty")]
    EmptyCollection,
    #[error("document id cannot be empty")]
    EmptyId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address() {
        let addr: DocumentAddress = "boards/project-1".parse().unwrap();
        assert_eq!(addr.collection(), "boards");
        assert_eq!(addr.id(), "project-1");
    }

    #[test]
    fn id_keeps_later_slashes() {
        let addr: DocumentAddress = "boards/a/b".parse().unwrap();
        assert_eq!(addr.collection(), "boards");
        assert_eq!(addr.id(), "a/b");
    }

    #[test]
    fn values_are_not_escaped() {
        let addr = DocumentAddress::new("my boards", "ünïcode id");
        assert_eq!(addr.to_string(), "my boards/ünïcode id");
        assert!(addr.validate().is_ok());
    }

    #[test]
    fn rejects_missing_halves() {
        assert_eq!(
            "boards".parse::<DocumentAddress>(),
            Err(AddressError::MissingSlash("boards".to_string()))
        );
        assert_eq!(
            "/x".parse::<DocumentAddress>(),
            Err(AddressError::EmptyCollection)
        );
        assert_eq!(
            "boards/".parse::<DocumentAddress>(),
            Err(AddressError::EmptyId)
        );
    }
}
