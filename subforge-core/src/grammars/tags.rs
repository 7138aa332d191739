//! Tokenizing and formatting of dot-separated release tag lists.
//!
//! Naive splitting on `.` would shred compound tags like `DD5.1` and
//! `H.264`, so the tokenizer matches known compound shapes first.

use once_cell::sync::Lazy;
use regex::Regex;
use subforge_model::Tag;

/// Tag vocabulary the tags-only release alternative accepts (a release
/// name ending in one of these is a tag list, not a `-Group` suffix).
pub(crate) const KNOWN_TAG_PATTERN: &str = r"\d{3,4}p|4K|UHD|WEB-DL|WEBRip|BluRay|BDRip|BRRip|HDRip|HDTV|DVDRip|REMUX|DD5\.1|DDP5\.1|AC3|AAC2\.0|AAC|DTS|FLAC|H\.26[45]|x26[45]|XviD|HEVC|10bit|HDR10|HDR|PROPER|REPACK|iNTERNAL";

// Alternation order matters: compound shapes must win over the
// dot-delimited fallback token.
static TAG_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"H\.26[45]|[A-Za-z]+\d\.\d|[^.]+").unwrap());

pub fn parse_tags(text: &str) -> Vec<Tag> {
    TAG_TOKEN
        .find_iter(text)
        .map(|token| Tag::new(token.as_str()))
        .collect()
}

pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(Tag::as_str)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_tags_survive_tokenizing() {
        let tags = parse_tags("720p.WEB-DL.DD5.1.H.264");
        let texts: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(texts, ["720p", "WEB-DL", "DD5.1", "H.264"]);
    }

    #[test]
    fn audio_channel_tags_keep_their_dot() {
        let tags = parse_tags("1080p.BluRay.AAC2.0.x264");
        let texts: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(texts, ["1080p", "BluRay", "AAC2.0", "x264"]);
    }

    #[test]
    fn format_is_the_inverse_of_parse() {
        let text = "720p.WEB-DL.DD5.1.H.264";
        assert_eq!(format_tags(&parse_tags(text)), text);
    }
}
