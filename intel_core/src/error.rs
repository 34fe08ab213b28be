//! Errors surfaced by the intel core.
//!
//! Malformed chat lines are not errors; the parser skips them. Only problems
//! with a whole log source, configuration or the map reach the caller.

use thiserror::Error;

use star_map::MapError;

use crate::sources::SourceId;

#[derive(Debug, Error)]
pub enum IntelError {
    /// The source's bytes could not be decoded. The source is ignored until retried.
    #[error("log source {source_id} is unreadable: {reason}")]
    SourceUnreadable { source_id: SourceId, reason: String },

    /// The source failed earlier and has not been retried.
    #[error("log source {0} is ignored")]
    SourceIgnored(SourceId),

    #[error("unknown log source {0}")]
    UnknownSource(SourceId),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid chat line pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Map(#[from] MapError),
}

pub type Result<T> = std::result::Result<T, IntelError>;
