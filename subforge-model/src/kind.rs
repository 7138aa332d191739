use std::fmt;

/// Runtime tag identifying the entity kind a value or a property belongs to.
///
/// Dispatch tables (parsing registry, naming registry) and property keys are
/// keyed by this tag instead of reflecting on concrete types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Series,
    Season,
    Episode,
    Movie,
    Release,
    Subtitle,
    SubtitleRelease,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Series => "Series",
            EntityKind::Season => "Season",
            EntityKind::Episode => "Episode",
            EntityKind::Movie => "Movie",
            EntityKind::Release => "Release",
            EntityKind::Subtitle => "Subtitle",
            EntityKind::SubtitleRelease => "SubtitleRelease",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
