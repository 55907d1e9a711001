//! Property-based sorting of record lists.
//!
//! [`SortEngine`] orders records by one property path:
//!
//! - null values sort first in both directions
//! - naturally ordered values (strings, numbers, timestamps, enums, booleans)
//!   compare with each other by their intrinsic order
//! - values with a registered [`TypeFormatter`](crate::TypeFormatter) are
//!   formatted for the engine's locale and compared with its [`Collator`]
//! - anything else raises [`SeekerError::NotComparable`]
//!
//! Every record's property is read and classified exactly once before the
//! list is reordered, so a failing sort leaves the list untouched. The sort
//! is stable: records with equal keys keep their relative order.

use std::cmp::Ordering;

use crate::error::{Result, SeekerError};
use crate::formatter::FormatterRegistry;
use crate::locale::{Collator, Locale};
use crate::ordering::{classify, compare_values, Classification, Direction, SortState};
use crate::path::{PropertyAccessor, PropertyPath, PropertyResolver};
use crate::traits::Record;
use crate::value::{Number, Timestamp, Value, ValueType};

/// Owned sort key extracted from one record.
#[derive(Debug, Clone)]
enum SortKey {
    Null,
    Natural(NaturalKey),
    Formatted(String),
    Incomparable(ValueType),
}

#[derive(Debug, Clone)]
enum NaturalKey {
    String(String),
    Number(Number),
    Timestamp(Timestamp),
    Enum(u32),
    Bool(bool),
}

impl NaturalKey {
    fn from_value(value: &Value<'_>) -> Option<Self> {
        Some(match value {
            Value::String(s) => NaturalKey::String(s.to_string()),
            Value::Number(n) => NaturalKey::Number(*n),
            Value::Timestamp(t) => NaturalKey::Timestamp(*t),
            Value::Enum(d) => NaturalKey::Enum(*d),
            Value::Bool(b) => NaturalKey::Bool(*b),
            _ => return None,
        })
    }

    fn as_value(&self) -> Value<'_> {
        match self {
            NaturalKey::String(s) => Value::from(s),
            NaturalKey::Number(n) => Value::Number(*n),
            NaturalKey::Timestamp(t) => Value::Timestamp(*t),
            NaturalKey::Enum(d) => Value::Enum(*d),
            NaturalKey::Bool(b) => Value::Bool(*b),
        }
    }

    /// `None` when the keys are of different kinds.
    fn compare(&self, other: &NaturalKey) -> Option<Ordering> {
        compare_values(&self.as_value(), &other.as_value())
    }

    fn kind(&self) -> &'static str {
        match self {
            NaturalKey::String(_) => "string",
            NaturalKey::Number(_) => "number",
            NaturalKey::Timestamp(_) => "timestamp",
            NaturalKey::Enum(_) => "enum",
            NaturalKey::Bool(_) => "bool",
        }
    }
}

impl SortKey {
    fn describe(&self) -> String {
        match self {
            SortKey::Null => "null".to_string(),
            SortKey::Natural(key) => key.kind().to_string(),
            SortKey::Formatted(_) => "formatted value".to_string(),
            SortKey::Incomparable(value_type) => value_type.to_string(),
        }
    }

    /// Whether two non-null keys can be ordered against each other.
    fn comparable_with(&self, other: &SortKey) -> bool {
        match (self, other) {
            (SortKey::Natural(a), SortKey::Natural(b)) => a.compare(b).is_some(),
            (SortKey::Formatted(_), SortKey::Formatted(_)) => true,
            _ => false,
        }
    }
}

/// Sorts record lists by a property path.
///
/// ```
/// use folio_seeker::{
///     AccessError, FormatterRegistry, Locale, PropertyPath, PropertyResolver, Record,
///     SortEngine, SortState, Value,
/// };
///
/// struct City { name: &'static str }
///
/// impl Record for City {
///     fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
///         match name {
///             "name" => Ok(Value::from(self.name)),
///             _ => Err(AccessError::Unknown),
///         }
///     }
/// }
///
/// let resolver = PropertyResolver::new();
/// let formatters = FormatterRegistry::new();
/// let engine = SortEngine::new(&resolver, &formatters, &Locale::default());
///
/// let mut cities = vec![City { name: "Oslo" }, City { name: "Lima" }];
/// let state = SortState::ascending(PropertyPath::parse("name").unwrap());
/// engine.apply_if_requested(&mut cities, &state).unwrap();
/// assert_eq!(cities[0].name, "Lima");
/// ```
#[derive(Debug, Clone)]
pub struct SortEngine<'e> {
    resolver: &'e PropertyResolver,
    formatters: &'e FormatterRegistry,
    locale: Locale,
    collator: Collator,
}

impl<'e> SortEngine<'e> {
    /// Creates an engine formatting and collating for `locale`.
    pub fn new(
        resolver: &'e PropertyResolver,
        formatters: &'e FormatterRegistry,
        locale: &Locale,
    ) -> Self {
        SortEngine {
            resolver,
            formatters,
            locale: locale.clone(),
            collator: Collator::new(locale),
        }
    }

    /// Replaces the collator, e.g. to change its strength.
    pub fn with_collator(mut self, collator: Collator) -> Self {
        self.collator = collator;
        self
    }

    /// Sorts `list` in place if `state` requests a sort.
    ///
    /// Returns `Ok(true)` if the list was sorted and `Ok(false)` if the
    /// direction is [`Direction::Unsorted`]. On error the list is unchanged.
    pub fn apply_if_requested<R: Record>(
        &self,
        list: &mut Vec<R>,
        state: &SortState,
    ) -> Result<bool> {
        if !state.is_requested() {
            return Ok(false);
        }

        let keys = self.keys(list.iter().map(|r| r as &dyn Record), &state.field)?;
        validate(&keys, &state.field)?;

        let mut keyed: Vec<(SortKey, R)> = keys.into_iter().zip(list.drain(..)).collect();
        keyed.sort_by(|(a, _), (b, _)| self.compare_keys(a, b, state.direction));
        list.extend(keyed.into_iter().map(|(_, record)| record));

        tracing::debug!(
            field = state.field.as_str(),
            direction = %state.direction,
            count = list.len(),
            "sorted records"
        );
        Ok(true)
    }

    /// Returns a sorted copy of `list`, leaving the original untouched.
    pub fn sorted<R: Record + Clone>(&self, list: &[R], state: &SortState) -> Result<Vec<R>> {
        let mut copy = list.to_vec();
        self.apply_if_requested(&mut copy, state)?;
        Ok(copy)
    }

    /// Compares two records on the sort field of `state`.
    pub fn compare(&self, a: &dyn Record, b: &dyn Record, state: &SortState) -> Result<Ordering> {
        let keys = self.keys([a, b].into_iter(), &state.field)?;
        validate(&keys, &state.field)?;
        Ok(self.compare_keys(&keys[0], &keys[1], state.direction))
    }

    fn keys<'r>(
        &self,
        records: impl Iterator<Item = &'r dyn Record>,
        field: &PropertyPath,
    ) -> Result<Vec<SortKey>> {
        let accessor = self.resolver.accessor(field);
        records.map(|record| self.key(record, accessor)).collect()
    }

    fn key(&self, record: &dyn Record, accessor: PropertyAccessor<'_>) -> Result<SortKey> {
        let value = accessor.resolve(record)?;
        Ok(match classify(&value, self.formatters) {
            Classification::Null => SortKey::Null,
            Classification::NaturallyOrdered => match NaturalKey::from_value(&value) {
                Some(key) => SortKey::Natural(key),
                None => SortKey::Null,
            },
            Classification::FormatterMatched(formatter) => {
                SortKey::Formatted(formatter.format(&value, &self.locale))
            }
            Classification::Incomparable => match value.value_type() {
                Some(value_type) => SortKey::Incomparable(value_type),
                None => SortKey::Null,
            },
        })
    }

    fn compare_keys(&self, a: &SortKey, b: &SortKey, direction: Direction) -> Ordering {
        match (a, b) {
            (SortKey::Null, SortKey::Null) => Ordering::Equal,
            (SortKey::Null, _) => Ordering::Less,
            (_, SortKey::Null) => Ordering::Greater,
            (SortKey::Natural(a), SortKey::Natural(b)) => {
                direction.apply(a.compare(b).unwrap_or(Ordering::Equal))
            }
            (SortKey::Formatted(a), SortKey::Formatted(b)) => {
                direction.apply(self.collator.compare(a, b))
            }
            _ => Ordering::Equal,
        }
    }
}

/// Fails if any two non-null keys cannot be ordered against each other.
///
/// Keys are comparable with each other exactly when they are comparable with
/// the first non-null key, so one pass suffices.
fn validate(keys: &[SortKey], field: &PropertyPath) -> Result<()> {
    let mut present = keys.iter().filter(|k| !matches!(k, SortKey::Null));
    let first = match present.next() {
        Some(first) => first,
        None => return Ok(()),
    };
    for other in present {
        if !first.comparable_with(other) {
            return Err(SeekerError::NotComparable {
                path: field.to_string(),
                left: first.describe(),
                right: other.describe(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::FnFormatter;
    use crate::traits::AccessError;

    #[derive(Debug, Clone, PartialEq)]
    struct Version(u32, u32);

    #[derive(Debug, Clone)]
    struct Release {
        id: u32,
        name: Option<String>,
        version: Option<Version>,
        mixed: Option<i64>,
    }

    impl Record for Release {
        fn property(&self, name: &str) -> std::result::Result<Value<'_>, AccessError> {
            match name {
                "id" => Ok(Value::from(self.id)),
                "name" => Ok(Value::from(self.name.as_ref())),
                "version" => Ok(self.version.as_ref().map_or(Value::Null, |v| Value::Custom(v))),
                // Odd ids answer with a string, even ones with a number
                "mixed" => Ok(match self.mixed {
                    Some(n) if n % 2 == 1 => Value::from(n.to_string()),
                    Some(n) => Value::from(n),
                    None => Value::Null,
                }),
                _ => Err(AccessError::Unknown),
            }
        }
    }

    fn release(id: u32, name: Option<&str>) -> Release {
        Release {
            id,
            name: name.map(str::to_string),
            version: None,
            mixed: None,
        }
    }

    fn path(raw: &str) -> PropertyPath {
        PropertyPath::parse(raw).unwrap()
    }

    fn ids(list: &[Release]) -> Vec<u32> {
        list.iter().map(|r| r.id).collect()
    }

    fn version_formatter() -> FormatterRegistry {
        FormatterRegistry::new().with(FnFormatter::new(ValueType::custom::<Version>(), |v, _| {
            v.downcast_ref::<Version>()
                .map(|v| format!("{:03}.{:03}", v.0, v.1))
                .unwrap_or_default()
        }))
    }

    #[test]
    fn integers_and_floats_sort_exactly() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let row = |id: u32, n: serde_json::Value| match serde_json::json!({ "id": id, "n": n }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut rows = vec![
            row(1, serde_json::json!(9_007_199_254_740_993_i64)),
            row(2, serde_json::json!(9_007_199_254_740_992.0_f64)),
            row(3, serde_json::json!(9_007_199_254_740_992_i64)),
            row(4, serde_json::json!(2.5)),
            row(5, serde_json::json!(-1)),
        ];

        engine
            .apply_if_requested(&mut rows, &SortState::ascending(path("n")))
            .unwrap();
        let order: Vec<_> = rows.iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(order, vec![5, 4, 2, 3, 1]);
    }

    #[test]
    fn unsorted_state_is_a_no_op() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list = vec![release(2, Some("b")), release(1, Some("a"))];
        let sorted = engine
            .apply_if_requested(&mut list, &SortState::unsorted(path("name")))
            .unwrap();

        assert!(!sorted);
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn nulls_sort_first_in_both_directions() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list = vec![
            release(1, Some("b")),
            release(2, None),
            release(3, Some("a")),
        ];

        engine
            .apply_if_requested(&mut list, &SortState::ascending(path("name")))
            .unwrap();
        assert_eq!(ids(&list), vec![2, 3, 1]);

        engine
            .apply_if_requested(&mut list, &SortState::descending(path("name")))
            .unwrap();
        assert_eq!(ids(&list), vec![2, 1, 3]);
    }

    #[test]
    fn sort_is_stable() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list = vec![
            release(1, Some("same")),
            release(2, Some("other")),
            release(3, Some("same")),
        ];
        engine
            .apply_if_requested(&mut list, &SortState::descending(path("name")))
            .unwrap();
        assert_eq!(ids(&list), vec![1, 3, 2]);
    }

    #[test]
    fn formatted_values_use_the_formatter() {
        let resolver = PropertyResolver::new();
        let formatters = version_formatter();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list: Vec<Release> = [(1, Version(1, 10)), (2, Version(1, 2)), (3, Version(0, 9))]
            .into_iter()
            .map(|(id, version)| Release {
                version: Some(version),
                ..release(id, None)
            })
            .collect();

        engine
            .apply_if_requested(&mut list, &SortState::ascending(path("version")))
            .unwrap();
        assert_eq!(ids(&list), vec![3, 2, 1]);
    }

    #[test]
    fn values_without_formatter_are_not_comparable() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list: Vec<Release> = (1..=2)
            .map(|id| Release {
                version: Some(Version(id, 0)),
                ..release(id, None)
            })
            .collect();

        let err = engine
            .apply_if_requested(&mut list, &SortState::ascending(path("version")))
            .unwrap_err();
        assert!(matches!(err, SeekerError::NotComparable { ref path, .. } if path == "version"));
        assert_eq!(ids(&list), vec![1, 2]);
    }

    #[test]
    fn single_incomparable_value_among_nulls_sorts() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list = vec![
            Release {
                version: Some(Version(1, 0)),
                ..release(1, None)
            },
            release(2, None),
        ];
        engine
            .apply_if_requested(&mut list, &SortState::ascending(path("version")))
            .unwrap();
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn mixed_natural_types_are_not_comparable() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list: Vec<Release> = (1..=2)
            .map(|id| Release {
                mixed: Some(i64::from(id)),
                ..release(id, None)
            })
            .collect();

        let err = engine
            .apply_if_requested(&mut list, &SortState::ascending(path("mixed")))
            .unwrap_err();
        assert_eq!(
            err,
            SeekerError::NotComparable {
                path: "mixed".into(),
                left: "string".into(),
                right: "number".into(),
            }
        );
    }

    #[test]
    fn unknown_field_propagates_resolution_error() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let mut list = vec![release(1, Some("a")), release(2, Some("b"))];
        let err = engine
            .apply_if_requested(&mut list, &SortState::ascending(path("weight")))
            .unwrap_err();
        assert!(matches!(err, SeekerError::PropertyNotFound { .. }));
    }

    #[test]
    fn sorted_copy_leaves_original() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let list = vec![release(2, Some("b")), release(1, Some("a"))];
        let sorted = engine
            .sorted(&list, &SortState::ascending(path("id")))
            .unwrap();

        assert_eq!(ids(&sorted), vec![1, 2]);
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn compare_two_records() {
        let resolver = PropertyResolver::new();
        let formatters = FormatterRegistry::new();
        let engine = SortEngine::new(&resolver, &formatters, &Locale::default());

        let a = release(1, Some("apple"));
        let b = release(2, Some("banana"));
        let state = SortState::descending(path("name"));

        assert_eq!(engine.compare(&a, &b, &state).unwrap(), Ordering::Greater);
        assert_eq!(engine.compare(&b, &a, &state).unwrap(), Ordering::Less);
    }
}
