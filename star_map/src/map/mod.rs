//! Star Map - the adjacency graph of all known locations.

mod catalog;

pub use catalog::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::alarm::StatusUpdate;
use crate::error::MapError;
use crate::location::{Location, LocationId};

/// The main map structure.
///
/// Locations are stored by id with a name index. The neighbour relation is
/// undirected; every mutation keeps it symmetric.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StarMap {
    /// All locations stored by ID.
    locations: HashMap<LocationId, Location>,

    /// Index: canonical name -> location, ordered by name.
    by_name: BTreeMap<String, LocationId>,
}

impl StarMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a location. Names and ids must be unique.
    pub fn add_location(&mut self, location: Location) -> Result<LocationId, MapError> {
        if self.by_name.contains_key(&location.name) || self.locations.contains_key(&location.id) {
            return Err(MapError::DuplicateLocation {
                name: location.name,
            });
        }
        let id = location.id;
        self.by_name.insert(location.name.clone(), id);
        self.locations.insert(id, location);
        Ok(id)
    }

    /// Connect two locations in both directions.
    pub fn connect(&mut self, a: LocationId, b: LocationId) -> Result<(), MapError> {
        for id in [a, b] {
            if !self.locations.contains_key(&id) {
                return Err(MapError::UnknownLocationId(id));
            }
        }
        if let Some(location) = self.locations.get_mut(&a) {
            location.neighbours.insert(b);
        }
        if let Some(location) = self.locations.get_mut(&b) {
            location.neighbours.insert(a);
        }
        Ok(())
    }

    /// Remove the link between two locations in both directions.
    pub fn disconnect(&mut self, a: LocationId, b: LocationId) {
        if let Some(location) = self.locations.get_mut(&a) {
            location.neighbours.remove(&b);
        }
        if let Some(location) = self.locations.get_mut(&b) {
            location.neighbours.remove(&a);
        }
    }

    /// Get location by ID.
    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    /// Get mutable location by ID.
    pub fn get_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(&id)
    }

    /// Look up a location by name, case-insensitively.
    pub fn by_name(&self, name: &str) -> Option<&Location> {
        self.location_id(name).and_then(|id| self.locations.get(&id))
    }

    /// Resolve a name (case-insensitive) to its id.
    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(&name.trim().to_uppercase()).copied()
    }

    /// Canonical names with their ids, in ascending name order.
    pub fn names(&self) -> impl Iterator<Item = (&str, LocationId)> {
        self.by_name.iter().map(|(name, id)| (name.as_str(), *id))
    }

    /// Get all locations on the map.
    pub fn all_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Get the total number of locations.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Apply a status update to a location.
    ///
    /// Returns `Ok(true)` if the persisted state changed.
    pub fn set_status(
        &mut self,
        id: LocationId,
        update: StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<bool, MapError> {
        self.locations
            .get_mut(&id)
            .map(|location| location.set_status(update, now))
            .ok_or(MapError::UnknownLocationId(id))
    }

    /// Apply a status update to a location given by name, e.g. a manual override.
    pub fn set_status_by_name(
        &mut self,
        name: &str,
        update: StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<bool, MapError> {
        let id = self
            .location_id(name)
            .ok_or_else(|| MapError::UnknownLocationName(name.to_string()))?;
        self.set_status(id, update, now)
    }

    /// All locations within `distance` jumps of `origin`, with their hop count.
    ///
    /// Breadth-first: `distance == 0` yields only the origin at 0. An unknown
    /// origin yields an empty map.
    pub fn neighbours(&self, origin: LocationId, distance: u32) -> BTreeMap<LocationId, u32> {
        let mut reached = BTreeMap::new();
        if !self.locations.contains_key(&origin) {
            return reached;
        }
        reached.insert(origin, 0);

        let mut frontier = vec![origin];
        for hop in 1..=distance {
            let mut next = Vec::new();
            for id in &frontier {
                let Some(location) = self.locations.get(id) else {
                    continue;
                };
                for neighbour in &location.neighbours {
                    if !reached.contains_key(neighbour) {
                        reached.insert(*neighbour, hop);
                        next.push(*neighbour);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        reached
    }

    /// Move a character to a location, removing it from wherever it was.
    ///
    /// `None` (or an id not on the map) just removes the character.
    pub fn set_character_location(&mut self, character: &str, location: Option<LocationId>) {
        for entry in self.locations.values_mut() {
            entry.remove_located_character(character);
        }
        if let Some(entry) = location.and_then(|id| self.locations.get_mut(&id)) {
            entry.add_located_character(character);
        }
    }

    /// Where a character currently is, if known.
    pub fn character_location(&self, character: &str) -> Option<LocationId> {
        self.locations
            .values()
            .find(|l| l.located_characters().iter().any(|c| c == character))
            .map(|l| l.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmState;
    use chrono::TimeZone;

    /// A - B - C - D - E chain plus an isolated F.
    fn setup_test_map() -> StarMap {
        let mut map = StarMap::new();
        for (id, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E"), (6, "F")] {
            map.add_location(Location::new(LocationId(id), name)).unwrap();
        }
        for (a, b) in [(1, 2), (2, 3), (3, 4), (4, 5)] {
            map.connect(LocationId(a), LocationId(b)).unwrap();
        }
        map
    }

    /// Single-hop expansion applied `distance` times, for cross-checking.
    fn iterate_single_hops(map: &StarMap, origin: LocationId, distance: u32) -> BTreeMap<LocationId, u32> {
        let mut reached = BTreeMap::from([(origin, 0)]);
        for hop in 1..=distance {
            let current: Vec<_> = reached.keys().copied().collect();
            for id in current {
                for n in map.get(id).unwrap().neighbours() {
                    reached.entry(*n).or_insert(hop);
                }
            }
        }
        reached
    }

    #[test]
    fn test_connect_is_symmetric() {
        let map = setup_test_map();
        let a = map.get(LocationId(1)).unwrap();
        let b = map.get(LocationId(2)).unwrap();

        assert!(a.is_neighbour(LocationId(2)));
        assert!(b.is_neighbour(LocationId(1)));
    }

    #[test]
    fn test_disconnect_is_symmetric() {
        let mut map = setup_test_map();
        map.disconnect(LocationId(1), LocationId(2));

        assert!(!map.get(LocationId(1)).unwrap().is_neighbour(LocationId(2)));
        assert!(!map.get(LocationId(2)).unwrap().is_neighbour(LocationId(1)));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut map = setup_test_map();
        let result = map.add_location(Location::new(LocationId(99), "a"));
        assert!(matches!(result, Err(MapError::DuplicateLocation { name }) if name == "A"));

        let result = map.add_location(Location::new(LocationId(1), "Z"));
        assert!(matches!(result, Err(MapError::DuplicateLocation { name }) if name == "Z"));
    }

    #[test]
    fn test_connect_unknown_rejected() {
        let mut map = setup_test_map();
        assert!(matches!(
            map.connect(LocationId(1), LocationId(42)),
            Err(MapError::UnknownLocationId(LocationId(42)))
        ));
    }

    #[test]
    fn test_neighbours_distance_zero() {
        let map = setup_test_map();
        let result = map.neighbours(LocationId(3), 0);
        assert_eq!(result, BTreeMap::from([(LocationId(3), 0)]));
    }

    #[test]
    fn test_neighbours_hop_counts() {
        let map = setup_test_map();

        let one = map.neighbours(LocationId(3), 1);
        assert_eq!(one.len(), 3);
        assert_eq!(one[&LocationId(2)], 1);
        assert_eq!(one[&LocationId(4)], 1);

        let two = map.neighbours(LocationId(3), 2);
        assert_eq!(two.len(), 5);
        assert_eq!(two[&LocationId(1)], 2);
        assert_eq!(two[&LocationId(5)], 2);
    }

    #[test]
    fn test_neighbours_isolated() {
        let map = setup_test_map();
        let result = map.neighbours(LocationId(6), 3);
        assert_eq!(result, BTreeMap::from([(LocationId(6), 0)]));
    }

    #[test]
    fn test_neighbours_monotonic_and_matches_single_hops() {
        let map = setup_test_map();
        for origin in 1..=6 {
            let mut last_len = 0;
            for distance in 0..6 {
                let result = map.neighbours(LocationId(origin), distance);
                assert!(result.len() >= last_len);
                last_len = result.len();
                assert_eq!(result, iterate_single_hops(&map, LocationId(origin), distance));
            }
        }
    }

    #[test]
    fn test_set_status_by_id() {
        let mut map = setup_test_map();
        let now = Utc.with_ymd_and_hms(2015, 3, 4, 20, 12, 33).unwrap();

        assert!(map.set_status(LocationId(2), StatusUpdate::Alarm, now).unwrap());
        assert_eq!(map.get(LocationId(2)).unwrap().alarm_state(), AlarmState::Alarm);
        assert!(map.set_status(LocationId(77), StatusUpdate::Alarm, now).is_err());
    }

    #[test]
    fn test_manual_override_by_name() {
        let mut map = setup_test_map();
        let now = Utc.with_ymd_and_hms(2015, 3, 4, 20, 12, 33).unwrap();

        assert!(map.set_status_by_name("e", StatusUpdate::Clear, now).unwrap());
        assert_eq!(map.get(LocationId(5)).unwrap().alarm_state(), AlarmState::Clear);
        assert!(matches!(
            map.set_status_by_name("nowhere", StatusUpdate::Clear, now),
            Err(MapError::UnknownLocationName(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn test_lookup_by_name() {
        let map = setup_test_map();
        assert_eq!(map.location_id("c"), Some(LocationId(3)));
        assert_eq!(map.by_name(" d ").map(|l| l.id), Some(LocationId(4)));
        assert!(map.location_id("Z").is_none());

        let names: Vec<_> = map.names().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_character_moves() {
        let mut map = setup_test_map();

        map.set_character_location("Alice", Some(LocationId(1)));
        assert_eq!(map.character_location("Alice"), Some(LocationId(1)));

        map.set_character_location("Alice", Some(LocationId(4)));
        assert!(!map.get(LocationId(1)).unwrap().has_located_characters());
        assert_eq!(map.get(LocationId(4)).unwrap().located_characters(), &["Alice"]);

        map.set_character_location("Alice", None);
        assert!(map.character_location("Alice").is_none());
    }
}
