use std::collections::HashMap;
use std::fmt;
use subforge_model::EntityKind;
use tracing::trace;

/// Immutable identifier of one semantic field of one entity kind,
/// e.g. `Episode.numberInSeason`.
///
/// Keys are plain values; the standard set lives in
/// [`crate::grammars::keys`], and callers define their own the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey {
    pub entity: EntityKind,
    pub name: &'static str,
}

impl PropertyKey {
    pub const fn new(entity: EntityKind, name: &'static str) -> Self {
        PropertyKey { entity, name }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.name)
    }
}

/// What to do when two capture groups (inner or outer) produce a value for
/// the same key.
///
/// `Concatenate` keeps the historical behavior of joining both values;
/// `Reject` makes such a match fail outright, which the matcher reports as
/// NoMatch since duplication depends on the input text, not on the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePolicy {
    Concatenate { separator: &'static str },
    LastWins,
    Reject,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::Concatenate { separator: " " }
    }
}

/// Flat key→string mapping produced by a successful match and consumed by
/// exactly one mapper. Insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMapping {
    values: HashMap<PropertyKey, String>,
}

impl PropertyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one captured value under `policy`. Returns `false` only when
    /// the policy rejects a duplicate, which fails the enclosing match.
    pub fn insert(
        &mut self,
        key: PropertyKey,
        value: String,
        policy: &MergePolicy,
    ) -> bool {
        match self.values.get_mut(&key) {
            None => {
                self.values.insert(key, value);
                true
            }
            Some(existing) => match policy {
                MergePolicy::Concatenate { separator } => {
                    trace!(%key, "concatenating duplicate capture");
                    existing.push_str(separator);
                    existing.push_str(&value);
                    true
                }
                MergePolicy::LastWins => {
                    *existing = value;
                    true
                }
                MergePolicy::Reject => false,
            },
        }
    }

    /// Merge a nested matcher's result into this mapping.
    pub fn merge(&mut self, other: PropertyMapping, policy: &MergePolicy) -> bool {
        for (key, value) in other.values {
            if !self.insert(key, value, policy) {
                return false;
            }
        }
        true
    }

    /// Fixed defaults merge last and only fill keys no group produced.
    pub fn fill_default(&mut self, key: PropertyKey, value: &str) {
        self.values.entry(key).or_insert_with(|| value.to_string());
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.values.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: PropertyKey = PropertyKey::new(EntityKind::Episode, "title");

    #[test]
    fn concatenate_joins_duplicate_values() {
        let mut props = PropertyMapping::new();
        let policy = MergePolicy::Concatenate { separator: "-" };
        assert!(props.insert(KEY, "2024".into(), &policy));
        assert!(props.insert(KEY, "01".into(), &policy));
        assert_eq!(props.get(&KEY), Some("2024-01"));
    }

    #[test]
    fn last_wins_replaces() {
        let mut props = PropertyMapping::new();
        assert!(props.insert(KEY, "first".into(), &MergePolicy::LastWins));
        assert!(props.insert(KEY, "second".into(), &MergePolicy::LastWins));
        assert_eq!(props.get(&KEY), Some("second"));
    }

    #[test]
    fn reject_fails_on_duplicate() {
        let mut props = PropertyMapping::new();
        assert!(props.insert(KEY, "first".into(), &MergePolicy::Reject));
        assert!(!props.insert(KEY, "second".into(), &MergePolicy::Reject));
    }

    #[test]
    fn defaults_never_overwrite_captures() {
        let mut props = PropertyMapping::new();
        props.insert(KEY, "captured".into(), &MergePolicy::default());
        props.fill_default(KEY, "default");
        assert_eq!(props.get(&KEY), Some("captured"));

        let other = PropertyKey::new(EntityKind::Episode, "date");
        props.fill_default(other, "default");
        assert_eq!(props.get(&other), Some("default"));
    }
}
