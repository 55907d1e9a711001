//! Sort direction, sort state and value classification.
//!
//! Provides [`Direction`] and [`SortState`] for requested orderings, and
//! [`classify`], which puts every property value into exactly one ordering
//! class before any comparison happens.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::formatter::{FormatterRegistry, TypeFormatter};
use crate::path::PropertyPath;
use crate::value::Value;

/// Requested sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (smallest first).
    Ascending,
    /// Descending order (largest first).
    Descending,
    /// No sort requested.
    #[default]
    Unsorted,
}

impl Direction {
    /// Parses a `sortType` request value: `asc` or `desc`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim() {
            "asc" => Some(Direction::Ascending),
            "desc" => Some(Direction::Descending),
            _ => None,
        }
    }

    /// Returns `true` unless this is [`Direction::Unsorted`].
    pub fn is_sorted(self) -> bool {
        !matches!(self, Direction::Unsorted)
    }

    /// Applies this direction to an ordering of two non-null values.
    ///
    /// For `Descending`, reverses the ordering; otherwise returns it unchanged.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Descending => ordering.reverse(),
            _ => ordering,
        }
    }

    /// Returns the request parameter value of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
            Direction::Unsorted => "none",
        }
    }

    /// Direction a sort link should request next: descending after an
    /// ascending sort, ascending otherwise.
    pub fn toggled(self) -> Direction {
        match self {
            Direction::Ascending => Direction::Descending,
            _ => Direction::Ascending,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field and direction requested for the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    /// The property to sort by.
    pub field: PropertyPath,
    /// The sort direction.
    pub direction: Direction,
}

impl SortState {
    /// Creates a sort state.
    pub fn new(field: PropertyPath, direction: Direction) -> Self {
        SortState { field, direction }
    }

    /// Ascending sort on `field`.
    pub fn ascending(field: PropertyPath) -> Self {
        SortState::new(field, Direction::Ascending)
    }

    /// Descending sort on `field`.
    pub fn descending(field: PropertyPath) -> Self {
        SortState::new(field, Direction::Descending)
    }

    /// No sort on `field`.
    pub fn unsorted(field: PropertyPath) -> Self {
        SortState::new(field, Direction::Unsorted)
    }

    /// Returns `true` if a sort was requested.
    pub fn is_requested(&self) -> bool {
        self.direction.is_sorted()
    }
}

/// How a value takes part in sorting.
#[derive(Clone, Copy)]
pub enum Classification<'f> {
    /// Null value; always sorts first.
    Null,
    /// The value has an intrinsic order.
    NaturallyOrdered,
    /// The value is ordered by its formatted text.
    FormatterMatched(&'f dyn TypeFormatter),
    /// The value cannot be ordered.
    Incomparable,
}

impl fmt::Debug for Classification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Null => f.write_str("Null"),
            Classification::NaturallyOrdered => f.write_str("NaturallyOrdered"),
            Classification::FormatterMatched(fmt) => f
                .debug_tuple("FormatterMatched")
                .field(&fmt.value_type())
                .finish(),
            Classification::Incomparable => f.write_str("Incomparable"),
        }
    }
}

/// Classifies a value: natural order wins over formatters.
pub fn classify<'f>(value: &Value<'_>, formatters: &'f FormatterRegistry) -> Classification<'f> {
    if value.is_null() {
        Classification::Null
    } else if value.is_naturally_ordered() {
        Classification::NaturallyOrdered
    } else if let Some(formatter) = formatters.find(value) {
        Classification::FormatterMatched(formatter)
    } else {
        Classification::Incomparable
    }
}

/// Compares two values by natural order, nulls first.
///
/// Returns `None` if the types don't match or either value has no natural order.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),

        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Some(a.total_cmp(*b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::FnFormatter;
    use crate::value::{Number, Timestamp, ValueType};

    #[test]
    fn direction_apply() {
        assert_eq!(Direction::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Direction::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Descending.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Direction::Unsorted.apply(Ordering::Greater), Ordering::Greater);
    }

    #[test]
    fn direction_params() {
        assert_eq!(Direction::from_param("asc"), Some(Direction::Ascending));
        assert_eq!(Direction::from_param(" desc "), Some(Direction::Descending));
        assert_eq!(Direction::from_param("sideways"), None);
        assert_eq!(Direction::Descending.to_string(), "desc");
    }

    #[test]
    fn direction_toggle() {
        assert_eq!(Direction::Ascending.toggled(), Direction::Descending);
        assert_eq!(Direction::Descending.toggled(), Direction::Ascending);
        assert_eq!(Direction::Unsorted.toggled(), Direction::Ascending);
    }

    #[test]
    fn sort_state_constructors() {
        let field = PropertyPath::parse("name").unwrap();
        assert!(SortState::ascending(field.clone()).is_requested());
        assert!(SortState::descending(field.clone()).is_requested());
        assert!(!SortState::unsorted(field).is_requested());
    }

    #[test]
    fn classification_prefers_natural_order() {
        #[derive(Debug)]
        struct Opaque;

        let registry = FormatterRegistry::new()
            .with(FnFormatter::new(ValueType::Number, |_, _| "n".into()))
            .with(FnFormatter::new(ValueType::custom::<Opaque>(), |_, _| "o".into()));

        assert!(matches!(classify(&Value::Null, &registry), Classification::Null));
        assert!(matches!(
            classify(&Value::from(1i32), &registry),
            Classification::NaturallyOrdered
        ));
        assert!(matches!(
            classify(&Value::Custom(&Opaque), &registry),
            Classification::FormatterMatched(_)
        ));
        assert!(matches!(
            classify(&Value::Custom(&Opaque), &FormatterRegistry::new()),
            Classification::Incomparable
        ));
    }

    #[test]
    fn compare_nulls_first() {
        let none = Value::Null;
        let some = Value::from("test");

        assert_eq!(compare_values(&none, &some), Some(Ordering::Less));
        assert_eq!(compare_values(&some, &none), Some(Ordering::Greater));
        assert_eq!(compare_values(&none, &none), Some(Ordering::Equal));
    }

    #[test]
    fn compare_natural_values() {
        assert_eq!(
            compare_values(&Value::from("apple"), &Value::from("banana")),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::Number(Number::I64(20)), &Value::Number(Number::U64(10))),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(1000)),
                &Value::Timestamp(Timestamp(2000))
            ),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_values(&Value::Bool(false), &Value::Bool(true)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn compare_type_mismatch() {
        assert_eq!(
            compare_values(&Value::from("test"), &Value::from(42i64)),
            None
        );
    }
}
