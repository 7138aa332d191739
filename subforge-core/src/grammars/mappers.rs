//! Mappers assembling typed domain objects from the standard grammars'
//! property mappings. Scene names write spaces as dots; mappers convert
//! captured text back to human-readable titles.

use super::keys::*;
use super::tags::parse_tags;
use crate::error::MappingError;
use crate::mapper::{Mapper, date_prop, parse_prop, require_text, text_prop};
use crate::property::{PropertyKey, PropertyMapping};
use subforge_model::prelude::*;

/// `The.Big.Bang.Theory` → `The Big Bang Theory`.
fn words(raw: &str) -> String {
    raw.replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn series_ref(props: &PropertyMapping) -> Result<SeriesRef, MappingError> {
    let name = require_text(props, SERIES_NAME)?;
    Ok(SeriesRef {
        name: words(&name),
        year: parse_prop(props, SERIES_YEAR)?,
    })
}

#[derive(Debug, Default)]
pub struct EpisodeMapper;

impl EpisodeMapper {
    const KNOWN: &'static [PropertyKey] = &[
        SERIES_NAME,
        SERIES_YEAR,
        SEASON_NUMBER,
        EPISODE_NUMBER,
        EPISODE_LAST_NUMBER,
        EPISODE_NUMBER_IN_SERIES,
        EPISODE_TITLE,
        EPISODE_DATE,
    ];
}

impl Mapper<Episode> for EpisodeMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<Episode, MappingError> {
        Ok(Episode {
            series: series_ref(props)?,
            season: parse_prop::<u16>(props, SEASON_NUMBER)?.map(SeasonNumber::from),
            number: parse_prop::<u16>(props, EPISODE_NUMBER)?.map(EpisodeNumber::from),
            last_number: parse_prop::<u16>(props, EPISODE_LAST_NUMBER)?
                .map(EpisodeNumber::from),
            number_in_series: parse_prop::<u16>(props, EPISODE_NUMBER_IN_SERIES)?
                .map(EpisodeNumber::from),
            title: text_prop(props, EPISODE_TITLE).map(|t| words(&t)),
            date: date_prop(props, EPISODE_DATE, "%Y-%m-%d")?,
        })
    }
}

#[derive(Debug, Default)]
pub struct SeriesMapper;

impl SeriesMapper {
    const KNOWN: &'static [PropertyKey] = &[SERIES_NAME, SERIES_YEAR];
}

impl Mapper<Series> for SeriesMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<Series, MappingError> {
        let name = require_text(props, SERIES_NAME)?;
        Ok(Series {
            name: words(&name),
            kind: SeriesKind::Seasoned,
            year: parse_prop(props, SERIES_YEAR)?,
            seasons: Vec::new(),
        })
    }
}

#[derive(Debug, Default)]
pub struct SeasonMapper;

impl SeasonMapper {
    const KNOWN: &'static [PropertyKey] = &[SERIES_NAME, SERIES_YEAR, SEASON_NUMBER];
}

impl Mapper<Season> for SeasonMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<Season, MappingError> {
        Ok(Season {
            series: series_ref(props)?,
            number: parse_prop::<u16>(props, SEASON_NUMBER)?.map(SeasonNumber::from),
            title: None,
            episodes: Vec::new(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MovieMapper;

impl MovieMapper {
    const KNOWN: &'static [PropertyKey] = &[MOVIE_TITLE, MOVIE_YEAR];
}

impl Mapper<Movie> for MovieMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<Movie, MappingError> {
        let title = require_text(props, MOVIE_TITLE)?;
        Ok(Movie {
            title: words(&title),
            year: parse_prop(props, MOVIE_YEAR)?,
        })
    }
}

/// Builds a [`Release`] around whichever media entity the matched grammar
/// produced, wiring the nested object through the entity mappers.
#[derive(Debug, Default)]
pub struct ReleaseMapper {
    episode: EpisodeMapper,
    movie: MovieMapper,
}

impl ReleaseMapper {
    const KNOWN: &'static [PropertyKey] = &[
        SERIES_NAME,
        SERIES_YEAR,
        SEASON_NUMBER,
        EPISODE_NUMBER,
        EPISODE_LAST_NUMBER,
        EPISODE_NUMBER_IN_SERIES,
        EPISODE_TITLE,
        EPISODE_DATE,
        MOVIE_TITLE,
        MOVIE_YEAR,
        RELEASE_TAGS,
        RELEASE_GROUP,
    ];
}

impl Mapper<Release> for ReleaseMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<Release, MappingError> {
        let media: Media = if props.contains(&SERIES_NAME) {
            self.episode.map(props)?.into()
        } else if props.contains(&MOVIE_TITLE) {
            self.movie.map(props)?.into()
        } else {
            return Err(MappingError::MissingProperty(SERIES_NAME));
        };

        Ok(Release {
            name: None,
            media,
            tags: text_prop(props, RELEASE_TAGS)
                .map(|raw| parse_tags(&raw))
                .unwrap_or_default(),
            group: text_prop(props, RELEASE_GROUP).map(Group::new),
        })
    }
}

/// Bare subtitle: a media entity plus a language, no release layer.
#[derive(Debug, Default)]
pub struct SubtitleMapper {
    episode: EpisodeMapper,
    movie: MovieMapper,
}

impl SubtitleMapper {
    const KNOWN: &'static [PropertyKey] = &[
        SERIES_NAME,
        SERIES_YEAR,
        SEASON_NUMBER,
        EPISODE_NUMBER,
        EPISODE_LAST_NUMBER,
        EPISODE_NUMBER_IN_SERIES,
        EPISODE_TITLE,
        EPISODE_DATE,
        MOVIE_TITLE,
        MOVIE_YEAR,
        SUBTITLE_LANGUAGE,
    ];
}

impl Mapper<Subtitle> for SubtitleMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<Subtitle, MappingError> {
        let media: Media = if props.contains(&SERIES_NAME) {
            self.episode.map(props)?.into()
        } else if props.contains(&MOVIE_TITLE) {
            self.movie.map(props)?.into()
        } else {
            return Err(MappingError::MissingProperty(SERIES_NAME));
        };
        let language = require_text(props, SUBTITLE_LANGUAGE)?;
        Ok(Subtitle::new(media, Language::new(language)))
    }
}

#[derive(Debug, Default)]
pub struct SubtitleReleaseMapper {
    release: ReleaseMapper,
}

impl SubtitleReleaseMapper {
    const KNOWN: &'static [PropertyKey] = &[
        SERIES_NAME,
        SERIES_YEAR,
        SEASON_NUMBER,
        EPISODE_NUMBER,
        EPISODE_LAST_NUMBER,
        EPISODE_NUMBER_IN_SERIES,
        EPISODE_TITLE,
        EPISODE_DATE,
        MOVIE_TITLE,
        MOVIE_YEAR,
        RELEASE_TAGS,
        RELEASE_GROUP,
        SUBTITLE_LANGUAGE,
        SUBTITLE_SOURCE,
    ];
}

impl Mapper<SubtitleRelease> for SubtitleReleaseMapper {
    fn known_properties(&self) -> &[PropertyKey] {
        Self::KNOWN
    }

    fn map(&self, props: &PropertyMapping) -> Result<SubtitleRelease, MappingError> {
        let release = self.release.map(props)?;
        let language = require_text(props, SUBTITLE_LANGUAGE)?;
        Ok(SubtitleRelease {
            release,
            language: Language::new(language),
            source: text_prop(props, SUBTITLE_SOURCE).map(Group::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::MergePolicy;

    fn props(pairs: &[(PropertyKey, &str)]) -> PropertyMapping {
        let mut mapping = PropertyMapping::new();
        for (key, value) in pairs {
            mapping.insert(*key, value.to_string(), &MergePolicy::default());
        }
        mapping
    }

    #[test]
    fn episode_mapper_wires_the_series_back_reference() {
        let episode = EpisodeMapper
            .map(&props(&[
                (SERIES_NAME, "The.Big.Bang.Theory"),
                (SEASON_NUMBER, "08"),
                (EPISODE_NUMBER, "01"),
            ]))
            .unwrap();
        assert_eq!(episode.series.name, "The Big Bang Theory");
        assert_eq!(episode.season, Some(SeasonNumber::new(8)));
        assert_eq!(episode.number, Some(EpisodeNumber::new(1)));
        assert_eq!(episode.title, None);
    }

    #[test]
    fn missing_series_name_is_a_mapping_failure() {
        let err = EpisodeMapper
            .map(&props(&[(SEASON_NUMBER, "08")]))
            .unwrap_err();
        assert!(matches!(err, MappingError::MissingProperty(key) if key == SERIES_NAME));
    }

    #[test]
    fn invalid_date_stays_inside_the_mapper() {
        let err = EpisodeMapper
            .map(&props(&[
                (SERIES_NAME, "The.Daily.Show"),
                (EPISODE_DATE, "2024-13-40"),
            ]))
            .unwrap_err();
        assert!(matches!(err, MappingError::Conversion { key, .. } if key == EPISODE_DATE));
    }

    #[test]
    fn release_mapper_picks_the_media_kind_from_the_properties() {
        let release = ReleaseMapper::default()
            .map(&props(&[
                (MOVIE_TITLE, "The.Dark.Knight"),
                (MOVIE_YEAR, "2008"),
                (RELEASE_TAGS, "1080p.BluRay.x264"),
                (RELEASE_GROUP, "REFINED"),
            ]))
            .unwrap();
        let movie = release.media.as_movie().unwrap();
        assert_eq!(movie.title, "The Dark Knight");
        assert_eq!(movie.year, Some(2008));
        assert_eq!(release.tags.len(), 3);
        assert_eq!(release.group, Some(Group::new("REFINED")));
    }
}
