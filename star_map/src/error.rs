//! Errors raised while building or addressing the star map.

use thiserror::Error;

use crate::location::LocationId;

/// Failure modes of map construction and lookups.
#[derive(Debug, Error)]
pub enum MapError {
    /// Two catalog entries share the same canonical name.
    #[error("duplicate location name {name}")]
    DuplicateLocation { name: String },

    /// A jump or lookup referenced an id that is not on the map.
    #[error("unknown location id {0}")]
    UnknownLocationId(LocationId),

    /// A lookup referenced a name that is not on the map.
    #[error("unknown location name {0}")]
    UnknownLocationName(String),

    /// The catalog document could not be decoded.
    #[error("invalid map catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
