//! # Intel Core
//!
//! Turns intel chat lines into structured messages and applies them to a
//! [`star_map::StarMap`]. Everything here is synchronous and in-memory; file
//! tailing, timers and notification display belong to the caller.
//!
//! ## Core Components
//!
//! - **sources**: Log-source registry, file name and UTF-16 decoding
//! - **parser**: Line tokenizing, deduplication, local-chat location reports
//! - **recognizer**: Ship, URL and location matchers over rich text
//! - **classifier**: Clear / request / alarm intent of a message
//! - **propagation**: Status updates and notification candidates
//! - **session**: Ties the above to one map
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Utc;
//! use intel_core::{IntelConfig, IntelSession, ShipCatalog, SourceId};
//! use star_map::{MapCatalog, StarMap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = MapCatalog::from_json(r#"{"locations": [{"id": 1, "name": "J115-3"}]}"#)?;
//! let config = IntelConfig::default().with_watched_rooms(["Intel.North"]);
//! let mut session = IntelSession::new(config, StarMap::from_catalog(&catalog)?, ShipCatalog::default())?;
//!
//! let source = SourceId::new("Intel.North_20150304_201233.txt");
//! session.register_source(source.clone(), "Intel.North");
//! let (messages, events) =
//!     session.process_lines(&source, &["[ 2015.03.04 20:12:33 ] Bob > J115-3 red"], Utc::now())?;
//! println!("{} messages, {} events", messages.len(), events.len());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod message;
pub mod parser;
pub mod propagation;
pub mod recognizer;
pub mod session;
pub mod sources;

pub use classifier::*;
pub use config::*;
pub use error::IntelError;
pub use ledger::*;
pub use logging::*;
pub use message::*;
pub use parser::*;
pub use propagation::*;
pub use recognizer::*;
pub use session::*;
pub use sources::*;
