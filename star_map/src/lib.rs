//! # Star Map
//!
//! The location graph behind the intel tool. This crate owns every location,
//! the jump connections between them and the alarm state each one carries.
//! It knows nothing about chat text; the parser lives in `intel_core`.
//!
//! ## Core Components
//!
//! - **location**: A named node with neighbours, alarm state, message back-links and located characters
//! - **alarm**: The alarm state machine and its time-based decay tiers
//! - **map**: The graph itself, catalog loading and hop-distance queries

pub mod alarm;
pub mod error;
pub mod location;
pub mod map;

pub use alarm::*;
pub use error::*;
pub use location::*;
pub use map::*;
