use crate::error::ConfigurationError;
use crate::property::{MergePolicy, PropertyKey, PropertyMapping};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Rule converting raw text into a property mapping, or NoMatch (`None`).
///
/// Matchers are immutable after construction and shared freely across
/// threads; a `try_match` call is a single synchronous pass with no
/// observable intermediate state.
pub trait Matcher: fmt::Debug + Send + Sync {
    /// Full-string match. NoMatch is a normal return value, never an error.
    fn try_match(&self, text: &str) -> Option<PropertyMapping>;

    /// Every key this matcher (including nested delegates and defaults)
    /// can produce. Used for registration-time validation against mappers.
    fn declared_keys(&self) -> Vec<PropertyKey>;
}

/// What a capture group feeds: a property directly, or a nested matcher
/// applied to the captured substring.
#[derive(Clone)]
pub enum GroupEntry {
    Leaf(PropertyKey),
    Delegate(Arc<dyn Matcher>),
}

impl fmt::Debug for GroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupEntry::Leaf(key) => write!(f, "Leaf({key})"),
            GroupEntry::Delegate(_) => f.write_str("Delegate(..)"),
        }
    }
}

/// Compiled pattern plus a capture-group → entry map and fixed defaults.
///
/// The pattern is anchored on both ends at construction; matching is never
/// a substring search.
#[derive(Debug)]
pub struct PatternMatcher {
    pattern: Regex,
    groups: BTreeMap<usize, GroupEntry>,
    defaults: Vec<(PropertyKey, String)>,
    policy: MergePolicy,
}

impl PatternMatcher {
    /// Compile `pattern` and validate the group map against it, using the
    /// default merge policy.
    pub fn new(
        pattern: &str,
        groups: impl IntoIterator<Item = (usize, GroupEntry)>,
    ) -> Result<Self, ConfigurationError> {
        Self::with_merge_policy(pattern, groups, MergePolicy::default())
    }

    /// Compile `pattern` and validate the group map against it.
    ///
    /// The declared group indices must cover the pattern's capture groups
    /// exactly (use `(?:..)` for groups that should not capture); a
    /// mismatch is fatal here, never at match time. Two groups may target
    /// the same key, which the merge policy resolves per match; under
    /// `Reject` that layout is already a configuration error.
    pub fn with_merge_policy(
        pattern: &str,
        groups: impl IntoIterator<Item = (usize, GroupEntry)>,
        policy: MergePolicy,
    ) -> Result<Self, ConfigurationError> {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        let groups: BTreeMap<usize, GroupEntry> = groups.into_iter().collect();

        // The anchoring wrapper is non-capturing, so captures_len still
        // counts the author's groups plus the implicit whole-match group.
        let actual = pattern.captures_len() - 1;
        let declared: Vec<usize> = groups.keys().copied().collect();
        if declared.len() != actual || declared.iter().any(|&i| i == 0 || i > actual) {
            return Err(ConfigurationError::GroupCountMismatch { declared, actual });
        }

        if policy == MergePolicy::Reject {
            // Delegates count too: a leaf overlapping a nested matcher's
            // declared keys could never produce a successful match.
            let mut seen = Vec::new();
            for entry in groups.values() {
                let entry_keys = match entry {
                    GroupEntry::Leaf(key) => vec![*key],
                    GroupEntry::Delegate(inner) => inner.declared_keys(),
                };
                for key in entry_keys {
                    if seen.contains(&key) {
                        return Err(ConfigurationError::DuplicatePropertyKey(key));
                    }
                    seen.push(key);
                }
            }
        }

        Ok(PatternMatcher {
            pattern,
            groups,
            defaults: Vec::new(),
            policy,
        })
    }

    /// Fixed assignment merged in last, only filling keys no group produced.
    pub fn with_default(mut self, key: PropertyKey, value: impl Into<String>) -> Self {
        self.defaults.push((key, value.into()));
        self
    }
}

impl Matcher for PatternMatcher {
    fn try_match(&self, text: &str) -> Option<PropertyMapping> {
        let captures = self.pattern.captures(text)?;
        let mut props = PropertyMapping::new();

        for (&index, entry) in &self.groups {
            // Optional groups may not participate in a given match.
            let Some(capture) = captures.get(index) else {
                continue;
            };
            match entry {
                GroupEntry::Leaf(key) => {
                    if !props.insert(*key, capture.as_str().to_string(), &self.policy) {
                        trace!(%key, "duplicate capture rejected by merge policy");
                        return None;
                    }
                }
                GroupEntry::Delegate(inner) => {
                    // A failed inner match fails the whole outer match; no
                    // partial results leak through.
                    let inner_props = inner.try_match(capture.as_str())?;
                    if !props.merge(inner_props, &self.policy) {
                        return None;
                    }
                }
            }
        }

        for (key, value) in &self.defaults {
            props.fill_default(*key, value);
        }

        debug!(pattern = %self.pattern, properties = props.len(), "pattern matched");
        Some(props)
    }

    fn declared_keys(&self) -> Vec<PropertyKey> {
        let mut keys = Vec::new();
        for entry in self.groups.values() {
            match entry {
                GroupEntry::Leaf(key) => keys.push(*key),
                GroupEntry::Delegate(inner) => keys.extend(inner.declared_keys()),
            }
        }
        for (key, _) in &self.defaults {
            keys.push(*key);
        }
        keys.sort();
        keys.dedup();
        keys
    }
}

/// Ordered alternatives tried until one succeeds.
///
/// Registration order is the deterministic tie-break: authors register
/// more specific grammars before more general ones.
#[derive(Debug, Default)]
pub struct CompositeMatcher {
    alternatives: Vec<Arc<dyn Matcher>>,
}

impl CompositeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, matcher: impl Matcher + 'static) -> Self {
        self.alternatives.push(Arc::new(matcher));
        self
    }

    pub fn push_arc(mut self, matcher: Arc<dyn Matcher>) -> Self {
        self.alternatives.push(matcher);
        self
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl Matcher for CompositeMatcher {
    fn try_match(&self, text: &str) -> Option<PropertyMapping> {
        for (index, matcher) in self.alternatives.iter().enumerate() {
            if let Some(props) = matcher.try_match(text) {
                debug!(alternative = index, "composite alternative matched");
                return Some(props);
            }
        }
        None
    }

    fn declared_keys(&self) -> Vec<PropertyKey> {
        let mut keys: Vec<PropertyKey> = self
            .alternatives
            .iter()
            .flat_map(|m| m.declared_keys())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subforge_model::EntityKind;

    const NAME: PropertyKey = PropertyKey::new(EntityKind::Series, "name");
    const SEASON: PropertyKey = PropertyKey::new(EntityKind::Season, "number");
    const EPISODE: PropertyKey =
        PropertyKey::new(EntityKind::Episode, "numberInSeason");
    const GROUP: PropertyKey = PropertyKey::new(EntityKind::Release, "group");

    fn episode_matcher() -> PatternMatcher {
        PatternMatcher::new(
            r"(.+?)\.S(\d{1,2})E(\d{1,3})",
            [
                (1, GroupEntry::Leaf(NAME)),
                (2, GroupEntry::Leaf(SEASON)),
                (3, GroupEntry::Leaf(EPISODE)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn matches_full_string_only() {
        let matcher = episode_matcher();
        let props = matcher.try_match("Psych.S08E01").unwrap();
        assert_eq!(props.get(&NAME), Some("Psych"));
        assert_eq!(props.get(&SEASON), Some("08"));
        assert_eq!(props.get(&EPISODE), Some("01"));

        // Trailing text must not be silently ignored.
        assert!(matcher.try_match("Psych.S08E01.720p").is_none());
    }

    #[test]
    fn group_count_mismatch_is_fatal() {
        let err = PatternMatcher::new(
            r"(.+?)\.S(\d{1,2})E(\d{1,3})",
            [(1, GroupEntry::Leaf(NAME)), (2, GroupEntry::Leaf(SEASON))],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::GroupCountMismatch { actual: 3, .. }
        ));
    }

    #[test]
    fn duplicate_leaf_key_is_fatal_under_reject() {
        let err = PatternMatcher::with_merge_policy(
            r"(\w+)\.(\w+)",
            [(1, GroupEntry::Leaf(NAME)), (2, GroupEntry::Leaf(NAME))],
            MergePolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicatePropertyKey(_)));

        // The same layout is legal when the policy merges duplicates.
        let matcher = PatternMatcher::with_merge_policy(
            r"(\w+)\.(\w+)",
            [(1, GroupEntry::Leaf(NAME)), (2, GroupEntry::Leaf(NAME))],
            MergePolicy::Concatenate { separator: " " },
        )
        .unwrap();
        let props = matcher.try_match("Breaking.Bad").unwrap();
        assert_eq!(props.get(&NAME), Some("Breaking Bad"));
    }

    #[test]
    fn leaf_overlapping_delegate_keys_is_fatal_under_reject() {
        let err = PatternMatcher::with_merge_policy(
            r"(.+?\.S\d{1,2}E\d{1,3})-(\w+)",
            [
                (1, GroupEntry::Delegate(Arc::new(episode_matcher()))),
                (2, GroupEntry::Leaf(NAME)),
            ],
            MergePolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicatePropertyKey(key) if key == NAME));
    }

    #[test]
    fn delegate_merges_inner_mapping() {
        let outer = PatternMatcher::new(
            r"(.+?\.S\d{1,2}E\d{1,3})-(\w+)",
            [
                (1, GroupEntry::Delegate(Arc::new(episode_matcher()))),
                (2, GroupEntry::Leaf(GROUP)),
            ],
        )
        .unwrap();

        let props = outer.try_match("Psych.S08E01-EXCELLENCE").unwrap();
        assert_eq!(props.get(&NAME), Some("Psych"));
        assert_eq!(props.get(&GROUP), Some("EXCELLENCE"));
    }

    #[test]
    fn failed_delegate_fails_outer_match() {
        let outer = PatternMatcher::new(
            r"(.+)-(\w+)",
            [
                (1, GroupEntry::Delegate(Arc::new(episode_matcher()))),
                (2, GroupEntry::Leaf(GROUP)),
            ],
        )
        .unwrap();

        // Inner text has no SxxExx marker, so the whole match fails even
        // though the outer pattern alone would succeed.
        assert!(outer.try_match("JustAMovie-EXCELLENCE").is_none());
    }

    #[test]
    fn defaults_fill_only_absent_keys() {
        let matcher = PatternMatcher::new(
            r"(.+?)\.E(\d{1,3})",
            [(1, GroupEntry::Leaf(NAME)), (2, GroupEntry::Leaf(EPISODE))],
        )
        .unwrap()
        .with_default(SEASON, "1")
        .with_default(EPISODE, "0");

        let props = matcher.try_match("Firefly.E05").unwrap();
        assert_eq!(props.get(&SEASON), Some("1"));
        assert_eq!(props.get(&EPISODE), Some("05"));
    }

    #[test]
    fn optional_group_may_not_participate() {
        let matcher = PatternMatcher::new(
            r"(.+?)\.S(\d{1,2})E(\d{1,3})(?:E(\d{1,3}))?",
            [
                (1, GroupEntry::Leaf(NAME)),
                (2, GroupEntry::Leaf(SEASON)),
                (3, GroupEntry::Leaf(EPISODE)),
                (4, GroupEntry::Leaf(PropertyKey::new(
                    EntityKind::Episode,
                    "lastNumberInSeason",
                ))),
            ],
        )
        .unwrap();

        let props = matcher.try_match("Psych.S08E01").unwrap();
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn composite_first_success_wins() {
        let specific = PatternMatcher::new(
            r"(.+?)\.S(\d{1,2})E(\d{1,3})",
            [
                (1, GroupEntry::Leaf(NAME)),
                (2, GroupEntry::Leaf(SEASON)),
                (3, GroupEntry::Leaf(EPISODE)),
            ],
        )
        .unwrap();
        // Deliberately overlapping catch-all registered second.
        let general =
            PatternMatcher::new(r"(.+)", [(1, GroupEntry::Leaf(NAME))]).unwrap();

        let composite = CompositeMatcher::new().push(specific).push(general);
        let props = composite.try_match("Psych.S08E01").unwrap();
        assert_eq!(props.get(&SEASON), Some("08"));
    }

    #[test]
    fn empty_composite_is_no_match() {
        assert!(CompositeMatcher::new().try_match("anything").is_none());
    }
}
