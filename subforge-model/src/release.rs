use crate::media::Media;
use crate::tags::{Language, Tag};
use std::fmt;

/// Release or subtitle group name, e.g. `EXCELLENCE`, `SubCentral`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group(String);

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Group(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Group {
    fn from(name: &str) -> Self {
        Group(name.to_string())
    }
}

/// A packaged media release as published by a scene/P2P group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Release {
    /// Literal name as published, when known. Namers can prefer this over
    /// the computed rendering.
    pub name: Option<String>,
    pub media: Media,
    pub tags: Vec<Tag>,
    pub group: Option<Group>,
}

impl Release {
    pub fn new(media: impl Into<Media>) -> Self {
        Release {
            name: None,
            media: media.into(),
            tags: Vec::new(),
            group: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_group(mut self, group: impl Into<Group>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// A subtitle for some media in one language.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subtitle {
    pub media: Media,
    pub language: Language,
}

impl Subtitle {
    pub fn new(media: impl Into<Media>, language: impl Into<Language>) -> Self {
        Subtitle {
            media: media.into(),
            language: language.into(),
        }
    }
}

/// A subtitle release: a subtitle adjusted to match one media release,
/// published by a subtitle community. Its name embeds the matched release's
/// name, which is why the subtitle grammar delegates to the release grammar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubtitleRelease {
    pub release: Release,
    pub language: Language,
    /// Community or group that produced the subtitle, e.g. `SubCentral`.
    pub source: Option<Group>,
}

impl SubtitleRelease {
    pub fn new(release: Release, language: impl Into<Language>) -> Self {
        SubtitleRelease {
            release,
            language: language.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<Group>) -> Self {
        self.source = Some(source.into());
        self
    }
}
