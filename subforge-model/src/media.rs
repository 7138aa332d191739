use crate::kind::EntityKind;
use crate::numbers::{EpisodeNumber, SeasonNumber};
use chrono::NaiveDate;
use std::fmt;

/// Non-owning upward reference from a season/episode to its series.
///
/// The series owns its seasons and episodes; the children carry this plain
/// value back-pointer instead of a shared-ownership edge, so the entity tree
/// stays a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesRef {
    pub name: String,
    pub year: Option<u16>,
}

impl SeriesRef {
    pub fn new(name: impl Into<String>) -> Self {
        SeriesRef {
            name: name.into(),
            year: None,
        }
    }

    pub fn with_year(name: impl Into<String>, year: u16) -> Self {
        SeriesRef {
            name: name.into(),
            year: Some(year),
        }
    }
}

impl fmt::Display for SeriesRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How a series orders its episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeriesKind {
    /// Regular seasons with numbered episodes (S08E01)
    #[default]
    Seasoned,
    /// A single run of episodes without seasons
    MiniSeries,
    /// Daily shows identified by air date
    Dated,
}

/// A series owning its seasons.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub year: Option<u16>,
    pub seasons: Vec<Season>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Series {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn series_ref(&self) -> SeriesRef {
        SeriesRef {
            name: self.name.clone(),
            year: self.year,
        }
    }
}

/// A season owning its episodes; `series` is a non-owning back-reference.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Season {
    pub series: SeriesRef,
    pub number: Option<SeasonNumber>,
    pub title: Option<String>,
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn new(series: SeriesRef, number: impl Into<SeasonNumber>) -> Self {
        Season {
            series,
            number: Some(number.into()),
            ..Default::default()
        }
    }
}

/// One episode; upward links are plain values, never ownership edges.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Episode {
    pub series: SeriesRef,
    pub season: Option<SeasonNumber>,
    pub number: Option<EpisodeNumber>,
    /// Last episode number for multi-episode files (S01E01E02)
    pub last_number: Option<EpisodeNumber>,
    /// Absolute position for mini-series without seasons (E05)
    pub number_in_series: Option<EpisodeNumber>,
    pub title: Option<String>,
    /// Air date for date-ordered shows
    pub date: Option<NaiveDate>,
}

impl Episode {
    pub fn numbered(
        series: SeriesRef,
        season: impl Into<SeasonNumber>,
        number: impl Into<EpisodeNumber>,
    ) -> Self {
        Episode {
            series,
            season: Some(season.into()),
            number: Some(number.into()),
            ..Default::default()
        }
    }

    pub fn absolute(series: SeriesRef, number_in_series: impl Into<EpisodeNumber>) -> Self {
        Episode {
            series,
            number_in_series: Some(number_in_series.into()),
            ..Default::default()
        }
    }

    pub fn dated(series: SeriesRef, date: NaiveDate) -> Self {
        Episode {
            series,
            date: Some(date),
            ..Default::default()
        }
    }
}

/// A movie.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movie {
    pub title: String,
    pub year: Option<u16>,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: Option<u16>) -> Self {
        Movie {
            title: title.into(),
            year,
        }
    }
}

/// Tagged union over the media entities a release can package.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Media {
    Series(Series),
    Season(Season),
    Episode(Episode),
    Movie(Movie),
}

impl Media {
    pub fn kind(&self) -> EntityKind {
        match self {
            Media::Series(_) => EntityKind::Series,
            Media::Season(_) => EntityKind::Season,
            Media::Episode(_) => EntityKind::Episode,
            Media::Movie(_) => EntityKind::Movie,
        }
    }

    pub fn as_episode(&self) -> Option<&Episode> {
        match self {
            Media::Episode(episode) => Some(episode),
            _ => None,
        }
    }

    pub fn as_movie(&self) -> Option<&Movie> {
        match self {
            Media::Movie(movie) => Some(movie),
            _ => None,
        }
    }
}

impl From<Episode> for Media {
    fn from(episode: Episode) -> Self {
        Media::Episode(episode)
    }
}

impl From<Movie> for Media {
    fn from(movie: Movie) -> Self {
        Media::Movie(movie)
    }
}

impl From<Series> for Media {
    fn from(series: Series) -> Self {
        Media::Series(series)
    }
}

impl From<Season> for Media {
    fn from(season: Season) -> Self {
        Media::Season(season)
    }
}
