//! The standard grammar set: scene release grammars, the subtitle-release
//! grammar embedding them, and the symmetric namers.
//!
//! [`standard`] builds everything into one explicit [`Engine`] bundle that
//! callers construct at startup and pass by reference; there is no global
//! default registry.

pub mod keys;
pub mod matchers;
pub mod mappers;
pub mod namers;
pub mod tags;

pub use namers::scene_separators;
pub use tags::{format_tags, parse_tags};

use crate::error::{ConfigurationError, RenderError, Unparseable};
use crate::naming::{NamingParams, NamingService, SeparatorPolicy};
use crate::parse::{Parser, ParsingService, Position};
use mappers::{
    EpisodeMapper, MovieMapper, ReleaseMapper, SeasonMapper, SeriesMapper,
    SubtitleMapper, SubtitleReleaseMapper,
};
use namers::{
    EpisodeNamer, MediaNamer, MovieNamer, ReleaseNamer, SeasonNamer, SeriesNamer,
    SubtitleNamer, SubtitleReleaseNamer,
};
use std::any::Any;
use std::sync::Arc;
use subforge_model::prelude::*;

/// Grammar source name for the scene release grammars.
pub const SCENE: &str = "scene";
/// Grammar source name for the subtitle community grammar.
pub const SUBCENTRAL: &str = "subcentral";

/// The engine bundle: one parsing registry, one naming registry and the
/// separator policy they share.
#[derive(Debug)]
pub struct Engine {
    pub parsing: ParsingService,
    pub naming: NamingService,
    pub separators: Arc<SeparatorPolicy>,
}

impl Engine {
    pub fn parse<T: Send + 'static>(&self, text: &str) -> Result<T, Unparseable> {
        self.parsing.parse(text)
    }

    pub fn name<T: Any>(
        &self,
        obj: &T,
        params: &NamingParams,
    ) -> Result<String, RenderError> {
        self.naming.name(obj, params)
    }
}

/// Build the standard grammars into a fresh engine.
pub fn standard() -> Result<Engine, ConfigurationError> {
    let parsing = ParsingService::new("standard");

    parsing.register_parser(
        SCENE,
        Position::Last,
        Parser::<Episode>::from_arcs(matchers::episode_matcher()?, Arc::new(EpisodeMapper)),
    )?;
    parsing.register_parser(
        SCENE,
        Position::Last,
        Parser::<Season>::from_arcs(matchers::season_matcher()?, Arc::new(SeasonMapper)),
    )?;
    parsing.register_parser(
        SCENE,
        Position::Last,
        Parser::<Series>::from_arcs(matchers::series_matcher()?, Arc::new(SeriesMapper)),
    )?;
    parsing.register_parser(
        SCENE,
        Position::Last,
        Parser::<Movie>::from_arcs(matchers::movie_matcher()?, Arc::new(MovieMapper)),
    )?;
    parsing.register_parser(
        SCENE,
        Position::Last,
        Parser::<Release>::from_arcs(
            matchers::release_matcher()?,
            Arc::new(ReleaseMapper::default()),
        ),
    )?;
    parsing.register_parser(
        SUBCENTRAL,
        Position::Last,
        Parser::<Subtitle>::from_arcs(
            matchers::subtitle_matcher()?,
            Arc::new(SubtitleMapper::default()),
        ),
    )?;
    parsing.register_parser(
        SUBCENTRAL,
        Position::Last,
        Parser::<SubtitleRelease>::from_arcs(
            matchers::subtitle_release_matcher()?,
            Arc::new(SubtitleReleaseMapper::default()),
        ),
    )?;

    let separators = Arc::new(scene_separators());
    let naming = NamingService::new();
    naming.register_namer::<Series>(SeriesNamer::new(Arc::clone(&separators)));
    naming.register_namer::<Season>(SeasonNamer::new(Arc::clone(&separators)));
    naming.register_namer::<Episode>(EpisodeNamer::new(Arc::clone(&separators)));
    naming.register_namer::<Movie>(MovieNamer::new(Arc::clone(&separators)));
    naming.register_namer::<Media>(MediaNamer);
    naming.register_namer::<Subtitle>(SubtitleNamer::new(Arc::clone(&separators)));
    naming.register_namer::<Release>(ReleaseNamer::new(Arc::clone(&separators)));
    naming.register_namer::<SubtitleRelease>(SubtitleReleaseNamer::new(Arc::clone(
        &separators,
    )));

    Ok(Engine {
        parsing,
        naming,
        separators,
    })
}
