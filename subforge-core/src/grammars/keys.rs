//! Property keys of the standard grammars. Callers defining their own
//! grammars mint keys the same way; uniqueness is by (entity, name).

use crate::property::PropertyKey;
use subforge_model::EntityKind;

pub const SERIES_NAME: PropertyKey = PropertyKey::new(EntityKind::Series, "name");
pub const SERIES_YEAR: PropertyKey = PropertyKey::new(EntityKind::Series, "year");

pub const SEASON_NUMBER: PropertyKey = PropertyKey::new(EntityKind::Season, "number");

pub const EPISODE_NUMBER: PropertyKey =
    PropertyKey::new(EntityKind::Episode, "numberInSeason");
pub const EPISODE_LAST_NUMBER: PropertyKey =
    PropertyKey::new(EntityKind::Episode, "lastNumberInSeason");
pub const EPISODE_NUMBER_IN_SERIES: PropertyKey =
    PropertyKey::new(EntityKind::Episode, "numberInSeries");
pub const EPISODE_TITLE: PropertyKey = PropertyKey::new(EntityKind::Episode, "title");
pub const EPISODE_DATE: PropertyKey = PropertyKey::new(EntityKind::Episode, "date");

pub const MOVIE_TITLE: PropertyKey = PropertyKey::new(EntityKind::Movie, "title");
pub const MOVIE_YEAR: PropertyKey = PropertyKey::new(EntityKind::Movie, "year");

/// Naming-side field id for the rendered media part of a release name.
pub const RELEASE_MEDIA: PropertyKey = PropertyKey::new(EntityKind::Release, "media");
pub const RELEASE_TAGS: PropertyKey = PropertyKey::new(EntityKind::Release, "tags");
pub const RELEASE_GROUP: PropertyKey = PropertyKey::new(EntityKind::Release, "group");

pub const SUBTITLE_LANGUAGE: PropertyKey =
    PropertyKey::new(EntityKind::Subtitle, "language");
/// Naming-side field id for the rendered release part of a subtitle name.
pub const SUBTITLE_RELEASE: PropertyKey =
    PropertyKey::new(EntityKind::SubtitleRelease, "release");
pub const SUBTITLE_SOURCE: PropertyKey =
    PropertyKey::new(EntityKind::SubtitleRelease, "source");
