use crate::error::{ConfigurationError, Unparseable};
use crate::mapper::Mapper;
use crate::matcher::Matcher;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// One grammar variant for one target type: a matcher/mapper pair.
///
/// Pure function of its input with no mutable state, so one instance can be
/// reused from any number of threads.
pub struct Parser<T> {
    matcher: Arc<dyn Matcher>,
    mapper: Arc<dyn Mapper<T>>,
}

impl<T> Parser<T> {
    pub fn new(
        matcher: impl Matcher + 'static,
        mapper: impl Mapper<T> + 'static,
    ) -> Self {
        Parser {
            matcher: Arc::new(matcher),
            mapper: Arc::new(mapper),
        }
    }

    pub fn from_arcs(matcher: Arc<dyn Matcher>, mapper: Arc<dyn Mapper<T>>) -> Self {
        Parser { matcher, mapper }
    }

    /// NoMatch and contained mapping failures both come back as `None`;
    /// the mapper is never invoked when the matcher fails.
    pub fn parse(&self, text: &str) -> Option<T> {
        let props = self.matcher.try_match(text)?;
        match self.mapper.map(&props) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(%error, "mapping failed, degrading to NoMatch");
                None
            }
        }
    }

    /// The mapper must declare every key the matcher can produce.
    fn validate(&self) -> Result<(), ConfigurationError> {
        let known = self.mapper.known_properties();
        for key in self.matcher.declared_keys() {
            if !known.contains(&key) {
                return Err(ConfigurationError::UnknownProperty(key));
            }
        }
        Ok(())
    }
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            matcher: Arc::clone(&self.matcher),
            mapper: Arc::clone(&self.mapper),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("matcher", &self.matcher)
            .field("target", &type_name::<T>())
            .finish()
    }
}

/// Type-erased parser stored in the registry; `parse` downcasts back.
trait ErasedParser: Send + Sync {
    fn parse_erased(&self, text: &str) -> Option<Box<dyn Any + Send>>;
}

impl<T: Send + 'static> ErasedParser for Parser<T> {
    fn parse_erased(&self, text: &str) -> Option<Box<dyn Any + Send>> {
        self.parse(text)
            .map(|value| Box::new(value) as Box<dyn Any + Send>)
    }
}

/// Where a parser lands in the per-type priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Last,
    At(usize),
}

#[derive(Clone)]
struct ParserEntry {
    source: Arc<str>,
    parser: Arc<dyn ErasedParser>,
}

/// Registry dispatching parse requests across registered parsers.
///
/// Per target type it holds one immutable, atomically published snapshot of
/// the ordered parser list. Mutations rebuild the snapshot and swap it under
/// a short-lived write guard; a `parse` in flight keeps the snapshot it
/// acquired at call start, so it observes the list either entirely pre- or
/// entirely post-mutation, never partially mutated.
pub struct ParsingService {
    name: String,
    table: RwLock<HashMap<TypeId, Arc<Vec<ParserEntry>>>>,
}

impl ParsingService {
    pub fn new(name: impl Into<String>) -> Self {
        ParsingService {
            name: name.into(),
            table: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publish `parser` for `T` under the named grammar source.
    ///
    /// Configuration problems are caught here and block publishing; a rule
    /// that registers successfully can no longer fail structurally.
    pub fn register_parser<T: Send + 'static>(
        &self,
        source: &str,
        position: Position,
        parser: Parser<T>,
    ) -> Result<(), ConfigurationError> {
        parser.validate()?;

        let entry = ParserEntry {
            source: Arc::from(source),
            parser: Arc::new(parser),
        };

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let slot = table.entry(TypeId::of::<T>()).or_default();
        let mut next: Vec<ParserEntry> = slot.as_ref().clone();
        let index = match position {
            Position::First => 0,
            Position::Last => next.len(),
            Position::At(i) => i.min(next.len()),
        };
        next.insert(index, entry);
        *slot = Arc::new(next);
        debug!(service = %self.name, source, target = type_name::<T>(), "parser registered");
        Ok(())
    }

    /// Drop every parser the named source registered for `T`.
    pub fn unregister_all<T: Send + 'static>(&self, source: &str) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = table.get_mut(&TypeId::of::<T>()) {
            let next: Vec<ParserEntry> = slot
                .iter()
                .filter(|entry| entry.source.as_ref() != source)
                .cloned()
                .collect();
            *slot = Arc::new(next);
            debug!(service = %self.name, source, target = type_name::<T>(), "source unregistered");
        }
    }

    /// Try each registered parser for `T` in priority order and return the
    /// first success. Exhausting every parser yields [`Unparseable`], an
    /// expected outcome rather than an exception.
    pub fn parse<T: Send + 'static>(&self, text: &str) -> Result<T, Unparseable> {
        let snapshot = {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            table.get(&TypeId::of::<T>()).cloned()
        };

        if let Some(entries) = snapshot {
            for entry in entries.iter() {
                if let Some(boxed) = entry.parser.parse_erased(text) {
                    match boxed.downcast::<T>() {
                        Ok(value) => {
                            debug!(service = %self.name, source = %entry.source, "parsed");
                            return Ok(*value);
                        }
                        Err(_) => {
                            // Unreachable as entries are keyed by TypeId;
                            // skip rather than panic if it ever regresses.
                            warn!(service = %self.name, "downcast mismatch in parser table");
                        }
                    }
                }
            }
        }

        Err(Unparseable {
            target: type_name::<T>(),
            text: text.to_string(),
        })
    }

    /// Number of parsers currently registered for `T`.
    pub fn parser_count<T: 'static>(&self) -> usize {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.get(&TypeId::of::<T>()).map_or(0, |v| v.len())
    }
}

impl fmt::Debug for ParsingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsingService")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Façade querying several named services in caller-specified precedence
/// and returning the first success, for cross-source fallback resolution.
#[derive(Debug, Clone, Default)]
pub struct MultiParsingService {
    services: Vec<Arc<ParsingService>>,
}

impl MultiParsingService {
    pub fn new(services: impl IntoIterator<Item = Arc<ParsingService>>) -> Self {
        MultiParsingService {
            services: services.into_iter().collect(),
        }
    }

    pub fn parse<T: Send + 'static>(&self, text: &str) -> Result<T, Unparseable> {
        for service in &self.services {
            match service.parse::<T>(text) {
                Ok(value) => return Ok(value),
                Err(unparseable) => {
                    debug!(service = service.name(), %unparseable, "falling through");
                }
            }
        }
        Err(Unparseable {
            target: type_name::<T>(),
            text: text.to_string(),
        })
    }
}
