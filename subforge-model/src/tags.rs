use std::fmt;

/// One release tag (quality, source, audio or codec marker), e.g. `720p`,
/// `WEB-DL`, `DD5.1`, `H.264`. Tags compare case-sensitively; scene names
/// are case-significant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(String);

impl Tag {
    pub fn new(value: impl Into<String>) -> Self {
        Tag(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag(value.to_string())
    }
}

/// Subtitle language tag as published by the community, e.g. `de`, `en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Language(String);

impl Language {
    pub fn new(code: impl Into<String>) -> Self {
        Language(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Language {
    fn from(code: &str) -> Self {
        Language(code.to_string())
    }
}
