//! subforge-core: a bidirectional engine for community release names.
//!
//! The parsing side turns free-form release names
//! (`Psych.S08E01.720p.WEB-DL.DD5.1.H.264-EXCELLENCE.de-SubCentral`) into
//! typed domain objects from `subforge-model`; the naming side renders
//! those objects back to canonical names. Grammars are declarative
//! matcher/mapper pairs registered per target type; naming rules are
//! per-type namers dispatched through a service, delimited by a
//! specificity-ordered separator policy.
//!
//! Matchers, mappers, parsers and namers are immutable and freely shared
//! across threads; the registries publish immutable snapshots, so parsing
//! may run concurrently with re-registration.
#![allow(missing_docs)]

pub mod error;
pub mod grammars;
pub mod lookup;
pub mod mapper;
pub mod matcher;
pub mod naming;
pub mod parse;
pub mod property;

pub use error::{ConfigurationError, MappingError, RenderError, Unparseable};
pub use grammars::Engine;
pub use mapper::Mapper;
pub use matcher::{CompositeMatcher, GroupEntry, Matcher, PatternMatcher};
pub use naming::{
    NameBuilder, Namer, NamingParams, NamingService, SeparatorPolicy,
};
pub use parse::{MultiParsingService, Parser, ParsingService, Position};
pub use property::{MergePolicy, PropertyKey, PropertyMapping};
