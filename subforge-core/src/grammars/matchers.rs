//! The standard matcher set: scene episode/movie grammars, the release
//! grammar wrapping them, and the subtitle-release grammar wrapping that.
//!
//! Alternatives are registered most specific first; composite order is the
//! deterministic tie-break for overlapping grammars.

use super::keys::*;
use super::tags::KNOWN_TAG_PATTERN;
use crate::error::ConfigurationError;
use crate::matcher::{CompositeMatcher, GroupEntry, Matcher, PatternMatcher};
use crate::property::MergePolicy;
use std::sync::Arc;

/// Text span holding an episode marker, used to bound the media part of a
/// release name before delegating it to the episode grammar.
const EPISODE_SPAN: &str =
    r".+?\.(?:S\d{1,2}E\d{1,3}(?:E\d{1,3})?|\d{1,2}x\d{2,3}|E\d{1,3}|\d{4}\.\d{2}\.\d{2})";

/// Same for movies, which scene names bound with the production year.
const MOVIE_SPAN: &str = r".+?\.(?:19|20)\d{2}";

/// Optional series-year disambiguator between the name and the episode
/// marker (`Psych.2006.S08E01`), symmetric with what the namers render
/// under `includeYear`.
const YEAR_OPT: &str = r"(?:\.((?:19|20)\d{2}))?";

/// Episode grammars: multi-episode and SxxExx first, then NxNN, then
/// mini-series and date-ordered shows. Every shape accepts the optional
/// year disambiguator after the series name.
pub fn episode_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let multi = PatternMatcher::new(
        &format!(r"(.+?){YEAR_OPT}\.S(\d{{1,2}})E(\d{{1,3}})E(\d{{1,3}})"),
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
            (3, GroupEntry::Leaf(SEASON_NUMBER)),
            (4, GroupEntry::Leaf(EPISODE_NUMBER)),
            (5, GroupEntry::Leaf(EPISODE_LAST_NUMBER)),
        ],
    )?;

    let standard = PatternMatcher::new(
        &format!(r"(.+?){YEAR_OPT}\.S(\d{{1,2}})E(\d{{1,3}})"),
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
            (3, GroupEntry::Leaf(SEASON_NUMBER)),
            (4, GroupEntry::Leaf(EPISODE_NUMBER)),
        ],
    )?;

    let x_form = PatternMatcher::new(
        &format!(r"(.+?){YEAR_OPT}\.(\d{{1,2}})x(\d{{2,3}})"),
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
            (3, GroupEntry::Leaf(SEASON_NUMBER)),
            (4, GroupEntry::Leaf(EPISODE_NUMBER)),
        ],
    )?;

    // Mini-series without seasons use a bare absolute marker.
    let absolute = PatternMatcher::new(
        &format!(r"(.+?){YEAR_OPT}\.E(\d{{1,3}})"),
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
            (3, GroupEntry::Leaf(EPISODE_NUMBER_IN_SERIES)),
        ],
    )?;

    // The three date groups all feed EPISODE_DATE; the dash-joining merge
    // policy assembles the ISO date the mapper converts with chrono.
    let dated = PatternMatcher::with_merge_policy(
        &format!(r"(.+?){YEAR_OPT}\.(\d{{4}})\.(\d{{2}})\.(\d{{2}})"),
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
            (3, GroupEntry::Leaf(EPISODE_DATE)),
            (4, GroupEntry::Leaf(EPISODE_DATE)),
            (5, GroupEntry::Leaf(EPISODE_DATE)),
        ],
        MergePolicy::Concatenate { separator: "-" },
    )?;

    Ok(Arc::new(
        CompositeMatcher::new()
            .push(multi)
            .push(standard)
            .push(x_form)
            .push(absolute)
            .push(dated),
    ))
}

pub fn movie_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let year_bound = PatternMatcher::new(
        r"(.+?)\.((?:19|20)\d{2})",
        [
            (1, GroupEntry::Leaf(MOVIE_TITLE)),
            (2, GroupEntry::Leaf(MOVIE_YEAR)),
        ],
    )?;
    Ok(Arc::new(CompositeMatcher::new().push(year_bound)))
}

pub fn series_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let with_year = PatternMatcher::new(
        r"(.+?)\.\(?((?:19|20)\d{2})\)?",
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
        ],
    )?;
    // Catch-all last: any remaining text is taken as the bare series name.
    let bare = PatternMatcher::new(r"(.+)", [(1, GroupEntry::Leaf(SERIES_NAME))])?;
    Ok(Arc::new(CompositeMatcher::new().push(with_year).push(bare)))
}

pub fn season_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let standard = PatternMatcher::new(
        &format!(r"(.+?){YEAR_OPT}\.S(\d{{1,2}})"),
        [
            (1, GroupEntry::Leaf(SERIES_NAME)),
            (2, GroupEntry::Leaf(SERIES_YEAR)),
            (3, GroupEntry::Leaf(SEASON_NUMBER)),
        ],
    )?;
    Ok(Arc::new(CompositeMatcher::new().push(standard)))
}

/// The four shapes a release name takes around its media part:
/// known-tags-only, tags plus group, group only, bare.
fn release_shapes(
    span: &str,
    media: &Arc<CompositeMatcher>,
) -> Result<[PatternMatcher; 4], ConfigurationError> {
    let delegate = || GroupEntry::Delegate(Arc::clone(media) as Arc<dyn Matcher>);

    // A tail drawn entirely from the tag vocabulary is a tag list even when
    // a tag like WEB-DL ends in a dash-word; this must run before the
    // tags-plus-group shape to keep group-less names parseable.
    let tags_only = PatternMatcher::new(
        &format!(r"({span})\.((?:{KNOWN_TAG_PATTERN})(?:\.(?:{KNOWN_TAG_PATTERN}))*)"),
        [(1, delegate()), (2, GroupEntry::Leaf(RELEASE_TAGS))],
    )?;

    let tags_and_group = PatternMatcher::new(
        &format!(r"({span})\.(.+)-([A-Za-z0-9]+)"),
        [
            (1, delegate()),
            (2, GroupEntry::Leaf(RELEASE_TAGS)),
            (3, GroupEntry::Leaf(RELEASE_GROUP)),
        ],
    )?;

    let group_only = PatternMatcher::new(
        &format!(r"({span})-([A-Za-z0-9]+)"),
        [(1, delegate()), (2, GroupEntry::Leaf(RELEASE_GROUP))],
    )?;

    let bare = PatternMatcher::new(&format!(r"({span})"), [(1, delegate())])?;

    Ok([tags_only, tags_and_group, group_only, bare])
}

/// Release grammar: episode releases ahead of movie releases, since an
/// episode marker is more specific than a bare year.
pub fn release_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let episode = episode_matcher()?;
    let movie = movie_matcher()?;

    let mut composite = CompositeMatcher::new();
    for shape in release_shapes(EPISODE_SPAN, &episode)? {
        composite = composite.push(shape);
    }
    for shape in release_shapes(MOVIE_SPAN, &movie)? {
        composite = composite.push(shape);
    }
    Ok(Arc::new(composite))
}

/// Bare subtitle grammar: a media name plus a language tag, without the
/// release packaging layer.
pub fn subtitle_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let episode = episode_matcher()?;
    let movie = movie_matcher()?;

    let for_episode = PatternMatcher::new(
        r"(.+)\.([A-Za-z]{2,3})",
        [
            (1, GroupEntry::Delegate(episode as Arc<dyn Matcher>)),
            (2, GroupEntry::Leaf(SUBTITLE_LANGUAGE)),
        ],
    )?;
    let for_movie = PatternMatcher::new(
        r"(.+)\.([A-Za-z]{2,3})",
        [
            (1, GroupEntry::Delegate(movie as Arc<dyn Matcher>)),
            (2, GroupEntry::Leaf(SUBTITLE_LANGUAGE)),
        ],
    )?;

    Ok(Arc::new(
        CompositeMatcher::new().push(for_episode).push(for_movie),
    ))
}

/// Subtitle-release grammar: the embedded release name, a language tag and
/// an optional subtitle community suffix.
pub fn subtitle_release_matcher() -> Result<Arc<CompositeMatcher>, ConfigurationError> {
    let release = release_matcher()?;
    let delegate = || GroupEntry::Delegate(Arc::clone(&release) as Arc<dyn Matcher>);

    let with_source = PatternMatcher::new(
        r"(.+)\.([A-Za-z]{2,3})-([A-Za-z0-9]+)",
        [
            (1, delegate()),
            (2, GroupEntry::Leaf(SUBTITLE_LANGUAGE)),
            (3, GroupEntry::Leaf(SUBTITLE_SOURCE)),
        ],
    )?;

    let bare_language = PatternMatcher::new(
        r"(.+)\.([A-Za-z]{2,3})",
        [(1, delegate()), (2, GroupEntry::Leaf(SUBTITLE_LANGUAGE))],
    )?;

    Ok(Arc::new(
        CompositeMatcher::new().push(with_source).push(bare_language),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_matcher_reads_standard_form() {
        let matcher = episode_matcher().unwrap();
        let props = matcher.try_match("Psych.S08E01").unwrap();
        assert_eq!(props.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(props.get(&SEASON_NUMBER), Some("08"));
        assert_eq!(props.get(&EPISODE_NUMBER), Some("01"));
    }

    #[test]
    fn optional_year_disambiguator_feeds_series_year() {
        let matcher = episode_matcher().unwrap();

        let props = matcher.try_match("Psych.2006.S08E01").unwrap();
        assert_eq!(props.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(props.get(&SERIES_YEAR), Some("2006"));
        assert_eq!(props.get(&SEASON_NUMBER), Some("08"));

        // Without the disambiguator the group simply does not participate.
        let props = matcher.try_match("Psych.S08E01").unwrap();
        assert_eq!(props.get(&SERIES_YEAR), None);

        // A year-like token deeper in the name stays part of the name.
        let props = matcher.try_match("The.Show.2024.Reborn.S01E01").unwrap();
        assert_eq!(props.get(&SERIES_NAME), Some("The.Show.2024.Reborn"));
        assert_eq!(props.get(&SERIES_YEAR), None);
    }

    #[test]
    fn season_matcher_reads_the_year_disambiguator() {
        let matcher = season_matcher().unwrap();
        let props = matcher.try_match("Psych.2006.S08").unwrap();
        assert_eq!(props.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(props.get(&SERIES_YEAR), Some("2006"));
        assert_eq!(props.get(&SEASON_NUMBER), Some("08"));
    }

    #[test]
    fn dated_groups_concatenate_into_an_iso_date() {
        let matcher = episode_matcher().unwrap();
        let props = matcher.try_match("The.Daily.Show.2024.01.15").unwrap();
        assert_eq!(props.get(&EPISODE_DATE), Some("2024-01-15"));
    }

    #[test]
    fn release_matcher_splits_tags_and_group() {
        let matcher = release_matcher().unwrap();
        let props = matcher
            .try_match("Psych.S08E01.720p.WEB-DL.DD5.1.H.264-EXCELLENCE")
            .unwrap();
        assert_eq!(props.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(props.get(&RELEASE_TAGS), Some("720p.WEB-DL.DD5.1.H.264"));
        assert_eq!(props.get(&RELEASE_GROUP), Some("EXCELLENCE"));
    }

    #[test]
    fn groupless_release_keeps_dashed_tags_intact() {
        let matcher = release_matcher().unwrap();
        let props = matcher.try_match("Psych.S08E01.WEB-DL").unwrap();
        assert_eq!(props.get(&RELEASE_TAGS), Some("WEB-DL"));
        assert_eq!(props.get(&RELEASE_GROUP), None);
    }

    #[test]
    fn subtitle_release_embeds_the_release_grammar() {
        let matcher = subtitle_release_matcher().unwrap();
        let props = matcher
            .try_match("Psych.S08E01.720p.WEB-DL.DD5.1.H.264-EXCELLENCE.de-SubCentral")
            .unwrap();
        assert_eq!(props.get(&SERIES_NAME), Some("Psych"));
        assert_eq!(props.get(&RELEASE_GROUP), Some("EXCELLENCE"));
        assert_eq!(props.get(&SUBTITLE_LANGUAGE), Some("de"));
        assert_eq!(props.get(&SUBTITLE_SOURCE), Some("SubCentral"));
    }
}
