//! One running intel session: sources, parser, propagator and map.

use chrono::{DateTime, Utc};
use tracing::debug;

use star_map::StarMap;

use crate::config::IntelConfig;
use crate::error::{IntelError, Result};
use crate::message::Message;
use crate::parser::ChatParser;
use crate::propagation::{AlarmPropagator, IntelEvent};
use crate::recognizer::{EntityRecognizer, ShipCatalog};
use crate::sources::{LogSources, SourceId};

/// Everything one batch of new lines produced.
pub type Processed = (Vec<Message>, Vec<IntelEvent>);

#[derive(Debug, Clone)]
pub struct IntelSession {
    sources: LogSources,
    parser: ChatParser,
    propagator: AlarmPropagator,
    map: StarMap,
}

impl IntelSession {
    pub fn new(config: IntelConfig, map: StarMap, ships: ShipCatalog) -> Result<Self> {
        let propagator = AlarmPropagator::from_config(&config);
        Ok(Self {
            sources: LogSources::new(),
            parser: ChatParser::new(config, EntityRecognizer::new(ships))?,
            propagator,
            map,
        })
    }

    pub fn map(&self) -> &StarMap {
        &self.map
    }

    /// Mutable map access, e.g. for a manual status override.
    pub fn map_mut(&mut self) -> &mut StarMap {
        &mut self.map
    }

    pub fn sources(&self) -> &LogSources {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut LogSources {
        &mut self.sources
    }

    pub fn parser(&self) -> &ChatParser {
        &self.parser
    }

    pub fn propagator(&self) -> &AlarmPropagator {
        &self.propagator
    }

    pub fn propagator_mut(&mut self) -> &mut AlarmPropagator {
        &mut self.propagator
    }

    pub fn register_source(&mut self, id: SourceId, room: impl Into<String>) {
        self.sources.register(id, room);
    }

    /// Parse new lines of a source and apply the messages to the map.
    pub fn process_lines<S: AsRef<str>>(
        &mut self,
        id: &SourceId,
        lines: &[S],
        now: DateTime<Utc>,
    ) -> Result<Processed> {
        let source = self
            .sources
            .get(id)
            .ok_or_else(|| IntelError::UnknownSource(id.clone()))?;
        if source.ignored {
            return Err(IntelError::SourceIgnored(id.clone()));
        }

        let messages = if source.is_local() {
            self.sources.read_header(id, lines)?;
            let Some(source) = self.sources.get(id) else {
                return Err(IntelError::UnknownSource(id.clone()));
            };
            let listener = match &source.listener {
                Some(listener) if source.header_complete() => listener.clone(),
                _ => {
                    debug!(source = %id, "local chat header not complete yet");
                    return Ok((Vec::new(), Vec::new()));
                }
            };
            let room = source.room.clone();
            self.parser.parse_local_lines(&room, &listener, lines, &self.map)
        } else {
            let room = source.room.clone();
            self.parser.parse_lines(&room, lines, &mut self.map)
        };

        let mut events = Vec::new();
        for message in &messages {
            events.extend(self.propagator.apply(message, &mut self.map, now));
        }
        Ok((messages, events))
    }

    /// Decode raw log bytes of a source, then process its lines.
    pub fn process_bytes(&mut self, id: &SourceId, bytes: &[u8], now: DateTime<Utc>) -> Result<Processed> {
        let lines = self.sources.feed_bytes(id, bytes)?;
        self.process_lines(id, &lines, now)
    }
}
