//! Core data model definitions shared across subforge crates.
#![allow(missing_docs)]

pub mod kind;
pub mod media;
pub mod numbers;
pub mod prelude;
pub mod release;
pub mod tags;

// Intentionally curated re-exports for downstream consumers.
pub use kind::EntityKind;
pub use media::{Episode, Media, Movie, Season, Series, SeriesKind, SeriesRef};
pub use numbers::{EpisodeNumber, SeasonNumber};
pub use release::{Group, Release, Subtitle, SubtitleRelease};
pub use tags::{Language, Tag};
