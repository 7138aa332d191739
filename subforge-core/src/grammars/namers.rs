//! Namers rendering the domain graph back to canonical scene names.
//!
//! Composite namers render nested entities through the naming service, so
//! a namer registered for a new media kind slots in without touching these.

use super::keys::*;
use super::tags::format_tags;
use crate::error::RenderError;
use crate::naming::{NameBuilder, Namer, NamingParams, NamingService, SeparatorPolicy, params};
use std::sync::Arc;
use subforge_model::prelude::*;

/// `The Big Bang Theory` → `The.Big.Bang.Theory`.
fn dotted(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(".")
}

/// Delimiters of the scene naming style: dots everywhere, a dash in front
/// of the release group and the subtitle source.
pub fn scene_separators() -> SeparatorPolicy {
    SeparatorPolicy::new()
        .anywhere(".")
        .before(RELEASE_GROUP, "-")
        .before(SUBTITLE_SOURCE, "-")
}

#[derive(Debug)]
pub struct SeriesNamer {
    separators: Arc<SeparatorPolicy>,
}

impl SeriesNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        SeriesNamer { separators }
    }
}

impl Namer<Series> for SeriesNamer {
    fn name(
        &self,
        series: &Series,
        _service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        if series.name.is_empty() {
            return Err(RenderError::MissingProperty(SERIES_NAME));
        }
        let mut builder =
            NameBuilder::new(&self.separators).append(SERIES_NAME, dotted(&series.name));
        if naming_params.flag(params::INCLUDE_YEAR) {
            if let Some(year) = series.year {
                builder = builder.append(SERIES_YEAR, year.to_string());
            }
        }
        Ok(builder.build())
    }
}

#[derive(Debug)]
pub struct SeasonNamer {
    separators: Arc<SeparatorPolicy>,
}

impl SeasonNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        SeasonNamer { separators }
    }
}

impl Namer<Season> for SeasonNamer {
    fn name(
        &self,
        season: &Season,
        _service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        if season.series.name.is_empty() {
            return Err(RenderError::MissingProperty(SERIES_NAME));
        }
        let mut builder = NameBuilder::new(&self.separators)
            .append(SERIES_NAME, dotted(&season.series.name));
        if naming_params.flag(params::INCLUDE_YEAR) {
            if let Some(year) = season.series.year {
                builder = builder.append(SERIES_YEAR, year.to_string());
            }
        }
        if let Some(number) = season.number {
            builder = builder.append(SEASON_NUMBER, format!("S{:02}", number.value()));
        }
        Ok(builder.build())
    }
}

#[derive(Debug)]
pub struct EpisodeNamer {
    separators: Arc<SeparatorPolicy>,
}

impl EpisodeNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        EpisodeNamer { separators }
    }

    fn marker(episode: &Episode) -> Option<String> {
        match (episode.season, episode.number) {
            (Some(season), Some(number)) => {
                let mut marker = format!("S{:02}E{:02}", season.value(), number.value());
                if let Some(last) = episode.last_number {
                    marker.push_str(&format!("E{:02}", last.value()));
                }
                Some(marker)
            }
            _ => match episode.number_in_series {
                Some(absolute) => Some(format!("E{:02}", absolute.value())),
                None => episode.date.map(|date| date.format("%Y.%m.%d").to_string()),
            },
        }
    }
}

impl Namer<Episode> for EpisodeNamer {
    fn name(
        &self,
        episode: &Episode,
        _service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        if episode.series.name.is_empty() {
            return Err(RenderError::MissingProperty(SERIES_NAME));
        }

        let mut builder = NameBuilder::new(&self.separators)
            .append(SERIES_NAME, dotted(&episode.series.name));
        if naming_params.flag(params::INCLUDE_YEAR) {
            if let Some(year) = episode.series.year {
                builder = builder.append(SERIES_YEAR, year.to_string());
            }
        }
        builder = builder.append_opt(EPISODE_NUMBER, Self::marker(episode));
        if naming_params.flag(params::ALWAYS_INCLUDE_TITLE) {
            if let Some(title) = &episode.title {
                builder = builder.append(EPISODE_TITLE, dotted(title));
            }
        }
        Ok(builder.build())
    }
}

#[derive(Debug)]
pub struct MovieNamer {
    separators: Arc<SeparatorPolicy>,
}

impl MovieNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        MovieNamer { separators }
    }
}

impl Namer<Movie> for MovieNamer {
    fn name(
        &self,
        movie: &Movie,
        _service: &NamingService,
        _naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        if movie.title.is_empty() {
            return Err(RenderError::MissingProperty(MOVIE_TITLE));
        }
        // The year is part of a movie's scene identity, so it renders
        // whenever known, independent of the includeYear option.
        let mut builder =
            NameBuilder::new(&self.separators).append(MOVIE_TITLE, dotted(&movie.title));
        if let Some(year) = movie.year {
            builder = builder.append(MOVIE_YEAR, year.to_string());
        }
        Ok(builder.build())
    }
}

/// Variant dispatch for the media enum; each arm goes back through the
/// service so the per-type namers stay the single source of truth.
#[derive(Debug)]
pub struct MediaNamer;

impl Namer<Media> for MediaNamer {
    fn name(
        &self,
        media: &Media,
        service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        match media {
            Media::Series(series) => service.name(series, naming_params),
            Media::Season(season) => service.name(season, naming_params),
            Media::Episode(episode) => service.name(episode, naming_params),
            Media::Movie(movie) => service.name(movie, naming_params),
        }
    }
}

#[derive(Debug)]
pub struct ReleaseNamer {
    separators: Arc<SeparatorPolicy>,
}

impl ReleaseNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        ReleaseNamer { separators }
    }
}

impl Namer<Release> for ReleaseNamer {
    fn name(
        &self,
        release: &Release,
        service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        if naming_params.flag(params::PREFER_EXPLICIT_NAME) {
            if let Some(name) = &release.name {
                return Ok(name.clone());
            }
        }

        let media = service.name(&release.media, naming_params)?;
        let mut builder = NameBuilder::new(&self.separators).append(RELEASE_MEDIA, media);
        if !release.tags.is_empty() {
            let tags = match naming_params.text(params::TAG_SEPARATOR) {
                Some(separator) => release
                    .tags
                    .iter()
                    .map(Tag::as_str)
                    .collect::<Vec<_>>()
                    .join(separator),
                None => format_tags(&release.tags),
            };
            builder = builder.append(RELEASE_TAGS, tags);
        }
        builder = builder.append_opt(
            RELEASE_GROUP,
            release.group.as_ref().map(|g| g.as_str().to_string()),
        );
        Ok(builder.build())
    }
}

#[derive(Debug)]
pub struct SubtitleNamer {
    separators: Arc<SeparatorPolicy>,
}

impl SubtitleNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        SubtitleNamer { separators }
    }
}

impl Namer<Subtitle> for SubtitleNamer {
    fn name(
        &self,
        subtitle: &Subtitle,
        service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        let media = service.name(&subtitle.media, naming_params)?;
        Ok(NameBuilder::new(&self.separators)
            .append(RELEASE_MEDIA, media)
            .append(SUBTITLE_LANGUAGE, subtitle.language.code())
            .build())
    }
}

#[derive(Debug)]
pub struct SubtitleReleaseNamer {
    separators: Arc<SeparatorPolicy>,
}

impl SubtitleReleaseNamer {
    pub fn new(separators: Arc<SeparatorPolicy>) -> Self {
        SubtitleReleaseNamer { separators }
    }
}

impl Namer<SubtitleRelease> for SubtitleReleaseNamer {
    fn name(
        &self,
        subtitle: &SubtitleRelease,
        service: &NamingService,
        naming_params: &NamingParams,
    ) -> Result<String, RenderError> {
        let release = service.name(&subtitle.release, naming_params)?;
        let builder = NameBuilder::new(&self.separators)
            .append(SUBTITLE_RELEASE, release)
            .append(SUBTITLE_LANGUAGE, subtitle.language.code())
            .append_opt(
                SUBTITLE_SOURCE,
                subtitle.source.as_ref().map(|s| s.as_str().to_string()),
            );
        Ok(builder.build())
    }
}
