use crate::property::PropertyKey;
use thiserror::Error;

/// Fatal rule-definition errors, detected at registration time.
///
/// These block publishing the offending rule and are never deferred to a
/// parse call.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(
        "group map does not cover the pattern's capture groups: declared {declared:?}, pattern has {actual} group(s)"
    )]
    GroupCountMismatch { declared: Vec<usize>, actual: usize },

    #[error("duplicate property key {0} in one group map")]
    DuplicatePropertyKey(PropertyKey),

    #[error("matcher produces {0}, which the mapper does not declare")]
    UnknownProperty(PropertyKey),
}

/// All registered parsers for the target type returned NoMatch.
///
/// This is an expected, common outcome, not an exceptional one; callers
/// fall back to other sources or give up on the text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no registered grammar recognized {text:?} as {target}")]
pub struct Unparseable {
    pub target: &'static str,
    pub text: String,
}

/// A matched group's text failed typed conversion, or a mandatory property
/// was absent while building a domain object.
///
/// Contained to the failing parser: the parsing service degrades it to
/// NoMatch and tries the next alternative.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("missing mandatory property {0}")]
    MissingProperty(PropertyKey),

    #[error("cannot convert {value:?} for {key}: {reason}")]
    Conversion {
        key: PropertyKey,
        value: String,
        reason: String,
    },
}

/// Rendering failures surfaced by the naming service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("no namer registered for {0}")]
    NoNamer(&'static str),

    #[error("cannot render: mandatory property {0} is absent")]
    MissingProperty(PropertyKey),
}
