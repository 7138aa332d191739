use crate::property::PropertyKey;
use std::fmt;

/// One delimiter rule; `None` on a side means "any field".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparationRule {
    pub left: Option<PropertyKey>,
    pub right: Option<PropertyKey>,
    pub separator: String,
}

/// Resolves the delimiter between two adjacent rendered fields.
///
/// Specificity order, first match wins: exact ordered pair, then
/// (left, any), then (any, right), then (any, any), then the global
/// default (a single space).
#[derive(Debug, Clone)]
pub struct SeparatorPolicy {
    rules: Vec<SeparationRule>,
    fallback: String,
}

impl Default for SeparatorPolicy {
    fn default() -> Self {
        SeparatorPolicy {
            rules: Vec::new(),
            fallback: " ".to_string(),
        }
    }
}

impl SeparatorPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule for the exact ordered pair (left, right).
    pub fn between_pair(
        mut self,
        left: PropertyKey,
        right: PropertyKey,
        separator: impl Into<String>,
    ) -> Self {
        self.rules.push(SeparationRule {
            left: Some(left),
            right: Some(right),
            separator: separator.into(),
        });
        self
    }

    /// Rule for (left, any field).
    pub fn after(mut self, left: PropertyKey, separator: impl Into<String>) -> Self {
        self.rules.push(SeparationRule {
            left: Some(left),
            right: None,
            separator: separator.into(),
        });
        self
    }

    /// Rule for (any field, right).
    pub fn before(mut self, right: PropertyKey, separator: impl Into<String>) -> Self {
        self.rules.push(SeparationRule {
            left: None,
            right: Some(right),
            separator: separator.into(),
        });
        self
    }

    /// Rule for (any, any), overriding the global default.
    pub fn anywhere(mut self, separator: impl Into<String>) -> Self {
        self.rules.push(SeparationRule {
            left: None,
            right: None,
            separator: separator.into(),
        });
        self
    }

    pub fn between(&self, left: PropertyKey, right: PropertyKey) -> &str {
        let tiers: [(Option<PropertyKey>, Option<PropertyKey>); 4] = [
            (Some(left), Some(right)),
            (Some(left), None),
            (None, Some(right)),
            (None, None),
        ];
        for (want_left, want_right) in tiers {
            if let Some(rule) = self
                .rules
                .iter()
                .find(|r| r.left == want_left && r.right == want_right)
            {
                return &rule.separator;
            }
        }
        &self.fallback
    }
}

/// Assembles a name from rendered fields, inserting separators only
/// between two non-empty fields. An omitted field leaves no dangling
/// delimiter behind.
pub struct NameBuilder<'a> {
    policy: &'a SeparatorPolicy,
    parts: Vec<(PropertyKey, String)>,
}

impl<'a> NameBuilder<'a> {
    pub fn new(policy: &'a SeparatorPolicy) -> Self {
        NameBuilder {
            policy,
            parts: Vec::new(),
        }
    }

    pub fn append(mut self, key: PropertyKey, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.parts.push((key, text));
        }
        self
    }

    pub fn append_opt(self, key: PropertyKey, text: Option<String>) -> Self {
        match text {
            Some(text) => self.append(key, text),
            None => self,
        }
    }

    pub fn build(self) -> String {
        let mut out = String::new();
        let mut previous: Option<PropertyKey> = None;
        for (key, text) in self.parts {
            if let Some(prev) = previous {
                out.push_str(self.policy.between(prev, key));
            }
            out.push_str(&text);
            previous = Some(key);
        }
        out
    }
}

impl fmt::Debug for NameBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameBuilder")
            .field("parts", &self.parts.len())
            .finish()
    }
}
