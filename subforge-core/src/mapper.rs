use crate::error::MappingError;
use crate::property::{PropertyKey, PropertyMapping};
use chrono::NaiveDate;
use std::fmt::Display;
use std::str::FromStr;

/// Builds one typed domain object from a flat property mapping.
///
/// Mappers are stateless and immutable; a conversion failure is reported as
/// a [`MappingError`] for this parser only and never escapes the parser
/// boundary.
pub trait Mapper<T>: Send + Sync {
    /// Every key this mapper may read. Checked at registration time to be
    /// a superset of whatever the paired matcher produces.
    fn known_properties(&self) -> &[PropertyKey];

    fn map(&self, props: &PropertyMapping) -> Result<T, MappingError>;
}

/// Identity conversion: the captured text as-is.
pub fn text_prop(props: &PropertyMapping, key: PropertyKey) -> Option<String> {
    props.get(&key).map(str::to_string)
}

pub fn require_text(
    props: &PropertyMapping,
    key: PropertyKey,
) -> Result<String, MappingError> {
    text_prop(props, key).ok_or(MappingError::MissingProperty(key))
}

/// Typed conversion via `FromStr`; an absent key is `Ok(None)`, a present
/// but unconvertible value is a contained conversion failure.
pub fn parse_prop<T>(
    props: &PropertyMapping,
    key: PropertyKey,
) -> Result<Option<T>, MappingError>
where
    T: FromStr,
    T::Err: Display,
{
    match props.get(&key) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|e: T::Err| {
            MappingError::Conversion {
                key,
                value: raw.to_string(),
                reason: e.to_string(),
            }
        }),
    }
}

/// Date conversion with an explicit format, e.g. `%Y-%m-%d`.
pub fn date_prop(
    props: &PropertyMapping,
    key: PropertyKey,
    format: &str,
) -> Result<Option<NaiveDate>, MappingError> {
    match props.get(&key) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, format)
            .map(Some)
            .map_err(|e| MappingError::Conversion {
                key,
                value: raw.to_string(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::MergePolicy;
    use subforge_model::EntityKind;

    const SEASON: PropertyKey = PropertyKey::new(EntityKind::Season, "number");
    const DATE: PropertyKey = PropertyKey::new(EntityKind::Episode, "date");

    fn props_with(key: PropertyKey, value: &str) -> PropertyMapping {
        let mut props = PropertyMapping::new();
        props.insert(key, value.to_string(), &MergePolicy::default());
        props
    }

    #[test]
    fn parse_prop_converts_numbers() {
        let props = props_with(SEASON, "08");
        assert_eq!(parse_prop::<u16>(&props, SEASON).unwrap(), Some(8));
    }

    #[test]
    fn parse_prop_reports_bad_values_with_key() {
        let props = props_with(SEASON, "eight");
        let err = parse_prop::<u16>(&props, SEASON).unwrap_err();
        assert!(matches!(err, MappingError::Conversion { key, .. } if key == SEASON));
    }

    #[test]
    fn absent_key_is_not_an_error() {
        let props = PropertyMapping::new();
        assert_eq!(parse_prop::<u16>(&props, SEASON).unwrap(), None);
    }

    #[test]
    fn invalid_date_is_a_contained_conversion_failure() {
        let props = props_with(DATE, "2024-13-40");
        assert!(date_prop(&props, DATE, "%Y-%m-%d").is_err());

        let props = props_with(DATE, "2024-01-15");
        assert_eq!(
            date_prop(&props, DATE, "%Y-%m-%d").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }
}
