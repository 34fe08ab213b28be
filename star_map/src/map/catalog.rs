//! External map catalog: the location list and jump list the map is built from.

use serde::{Deserialize, Serialize};

use super::StarMap;
use crate::error::MapError;
use crate::location::{Location, LocationId};

/// A location entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLocation {
    pub id: u32,
    pub name: String,
}

/// Location list plus adjacency list, as produced by an external map source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapCatalog {
    pub locations: Vec<CatalogLocation>,
    /// Undirected jumps between location ids.
    #[serde(default)]
    pub jumps: Vec<(u32, u32)>,
}

impl MapCatalog {
    /// Decode a catalog from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl StarMap {
    /// Build a map from a catalog. Names are upper-cased; duplicates and
    /// jumps to unknown ids are rejected.
    pub fn from_catalog(catalog: &MapCatalog) -> Result<Self, MapError> {
        let mut map = StarMap::new();
        for entry in &catalog.locations {
            map.add_location(Location::new(LocationId(entry.id), &entry.name))?;
        }
        for (a, b) in &catalog.jumps {
            map.connect(LocationId(*a), LocationId(*b))?;
        }
        tracing::debug!(
            locations = map.location_count(),
            jumps = catalog.jumps.len(),
            "star map built from catalog"
        );
        Ok(map)
    }
}
