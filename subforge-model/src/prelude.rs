//! Curated import surface for engine and consumer crates.
//! Prefer importing from this module instead of individual tree nodes.

pub use crate::kind::EntityKind;
pub use crate::media::{
    Episode, Media, Movie, Season, Series, SeriesKind, SeriesRef,
};
pub use crate::numbers::{EpisodeNumber, SeasonNumber};
pub use crate::release::{Group, Release, Subtitle, SubtitleRelease};
pub use crate::tags::{Language, Tag};
