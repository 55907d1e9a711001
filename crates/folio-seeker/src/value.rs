//! Runtime value types for property access and comparison.
//!
//! The [`Value`] enum represents the runtime value of a property read from a
//! [`Record`]. Values either carry a natural ordering (strings, numbers,
//! timestamps, enums, booleans), point at a nested record, or wrap an opaque
//! application type that can only be ordered through a type formatter.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::traits::Record;

/// Runtime value of a property, borrowed from the source record where possible.
///
/// # Example
///
/// ```
/// use folio_seeker::{Value, Number};
///
/// let name = Value::from("Widget");
/// let stock = Value::from(12u32);
///
/// assert_eq!(name.as_str(), Some("Widget"));
/// assert_eq!(stock.as_number(), Some(Number::U64(12)));
/// assert!(Value::Null.is_null());
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// String value, borrowed or computed by the accessor.
    String(Cow<'a, str>),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum discriminant value.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Nested record, traversed by dotted paths.
    Record(&'a dyn Record),
    /// Application type without a natural order.
    Custom(&'a dyn Opaque),
    /// Absent value.
    Null,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the runtime type of the value, `None` for `Null`.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::String(_) => Some(ValueType::String),
            Value::Number(_) => Some(ValueType::Number),
            Value::Timestamp(_) => Some(ValueType::Timestamp),
            Value::Enum(_) => Some(ValueType::Enum),
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Record(record) => Some(ValueType::Record((**record).record_type())),
            Value::Custom(opaque) => Some((**opaque).opaque_type()),
            Value::Null => None,
        }
    }

    /// Returns `true` if the value has an intrinsic ordering.
    pub fn is_naturally_ordered(&self) -> bool {
        matches!(
            self,
            Value::String(_)
                | Value::Number(_)
                | Value::Timestamp(_)
                | Value::Enum(_)
                | Value::Bool(_)
        )
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the enum discriminant, if present.
    pub fn as_enum(&self) -> Option<u32> {
        match self {
            Value::Enum(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the nested record, if present.
    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match self {
            Value::Record(r) => Some(*r),
            _ => None,
        }
    }

    /// Downcasts a [`Value::Custom`] to its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match self {
            Value::Custom(opaque) => (**opaque).as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Plain rendering used when no formatter applies.
    ///
    /// Records and opaque values fall back to their `Debug` form.
    pub fn display_string(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Timestamp(t) => t.as_millis().to_string(),
            Value::Enum(d) => d.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Record(r) => (**r).record_type().to_string(),
            Value::Custom(opaque) => format!("{:?}", opaque),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Timestamp(t) => f.debug_tuple("Timestamp").field(t).finish(),
            Value::Enum(d) => f.debug_tuple("Enum").field(d).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Record(r) => f.debug_tuple("Record").field(&(**r).record_type()).finish(),
            Value::Custom(opaque) => f.debug_tuple("Custom").field(opaque).finish(),
            Value::Null => f.write_str("Null"),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            // Nested and opaque values compare by identity
            (Value::Record(a), Value::Record(b)) => std::ptr::addr_eq(*a, *b),
            (Value::Custom(a), Value::Custom(b)) => std::ptr::addr_eq(*a, *b),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Timestamp> for Value<'_> {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

macro_rules! value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Application values stored in [`Value::Custom`].
///
/// Implemented for every `Debug + 'static` type, so any value can be wrapped:
///
/// ```
/// use folio_seeker::{Value, ValueType};
///
/// #[derive(Debug)]
/// struct Money(i64);
///
/// let price = Money(1250);
/// let value = Value::Custom(&price);
/// assert_eq!(value.value_type(), Some(ValueType::custom::<Money>()));
/// assert_eq!(value.downcast_ref::<Money>().map(|m| m.0), Some(1250));
/// ```
pub trait Opaque: Any + fmt::Debug {
    /// Upcasts to `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Runtime type tag of the concrete value.
    fn opaque_type(&self) -> ValueType;
}

impl<T: Any + fmt::Debug> Opaque for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn opaque_type(&self) -> ValueType {
        ValueType::custom::<T>()
    }
}

/// Runtime type tag of a non-null [`Value`].
///
/// Type formatters register against a `ValueType` and match by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
    Timestamp,
    Enum,
    Bool,
    /// Nested record, named by [`Record::record_type`].
    Record(&'static str),
    /// Opaque application type.
    Custom(CustomType),
}

impl ValueType {
    /// Tag for an opaque application type.
    pub fn custom<T: Any>() -> Self {
        ValueType::Custom(CustomType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        })
    }

    /// Human-readable name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Timestamp => "timestamp",
            ValueType::Enum => "enum",
            ValueType::Bool => "bool",
            ValueType::Record(name) => name,
            ValueType::Custom(custom) => custom.name,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Identity of an opaque type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomType {
    id: TypeId,
    name: &'static str,
}

impl CustomType {
    /// The `TypeId` of the concrete type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision.
/// Comparisons between different numeric types are exact: integers never
/// round through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            (Number::I64(a), Number::U64(b)) => Some(cmp_signed_unsigned(a, b)),
            (Number::U64(a), Number::I64(b)) => Some(cmp_signed_unsigned(b, a).reverse()),
            (Number::I64(a), Number::F64(b)) => cmp_int_float(i128::from(a), b),
            (Number::U64(a), Number::F64(b)) => cmp_int_float(i128::from(a), b),
            (Number::F64(a), Number::I64(b)) => {
                cmp_int_float(i128::from(b), a).map(Ordering::reverse)
            }
            (Number::F64(a), Number::U64(b)) => {
                cmp_int_float(i128::from(b), a).map(Ordering::reverse)
            }
        }
    }

    /// Total order used for sorting: NaN sorts after every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.is_nan().cmp(&other.is_nan()))
    }

    fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }
}

/// Compares an integer with a float without rounding the integer.
fn cmp_int_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    let whole = float.trunc();
    let bound = 2f64.powi(127);
    if whole >= bound {
        return Some(Ordering::Less);
    }
    if whole < -bound {
        return Some(Ordering::Greater);
    }
    let ordering = int.cmp(&(whole as i128));
    if ordering != Ordering::Equal {
        return Some(ordering);
    }
    0f64.partial_cmp(&(float - whole))
}

fn cmp_signed_unsigned(a: i64, b: u64) -> Ordering {
    if a < 0 {
        Ordering::Less
    } else {
        (a as u64).cmp(&b)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Number::I64(n) => serializer.serialize_i64(*n),
            Number::U64(n) => serializer.serialize_u64(*n),
            Number::F64(n) => serializer.serialize_f64(*n),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// ```
/// use folio_seeker::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Money(i64);

    #[test]
    fn value_types() {
        assert_eq!(Value::from("x").value_type(), Some(ValueType::String));
        assert_eq!(Value::from(3i32).value_type(), Some(ValueType::Number));
        assert_eq!(
            Value::Timestamp(Timestamp(0)).value_type(),
            Some(ValueType::Timestamp)
        );
        assert_eq!(Value::Enum(1).value_type(), Some(ValueType::Enum));
        assert_eq!(Value::Bool(true).value_type(), Some(ValueType::Bool));
        assert_eq!(Value::Null.value_type(), None);
    }

    #[test]
    fn custom_values_downcast() {
        let money = Money(99);
        let value = Value::Custom(&money);

        assert_eq!(value.value_type(), Some(ValueType::custom::<Money>()));
        assert_eq!(value.downcast_ref::<Money>().map(|m| m.0), Some(99));
        assert!(value.downcast_ref::<String>().is_none());
        assert!(!value.is_naturally_ordered());
    }

    #[test]
    fn custom_type_equality_is_exact() {
        #[derive(Debug)]
        struct Other;
        assert_ne!(ValueType::custom::<Money>(), ValueType::custom::<Other>());
        assert_eq!(ValueType::custom::<Money>(), ValueType::custom::<Money>());
    }

    #[test]
    fn option_converts_to_null() {
        let none: Option<&str> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }

    #[test]
    fn borrowed_and_owned_strings_are_equal() {
        assert_eq!(Value::from("abc"), Value::from("abc".to_string()));
    }

    #[test]
    fn number_comparisons_same_type() {
        assert_eq!(
            Number::I64(5).compare(Number::I64(10)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(10).compare(Number::U64(5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::F64(5.0).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn number_comparisons_mixed_types() {
        assert_eq!(
            Number::I64(-1).compare(Number::U64(0)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::I64(i64::MAX)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::I64(5).compare(Number::F64(5.0)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn number_mixed_comparisons_are_exact() {
        let big = 1i64 << 53;
        let float = Number::F64(big as f64);
        assert_eq!(Number::I64(big + 1).compare(float), Some(Ordering::Greater));
        assert_eq!(float.compare(Number::I64(big + 1)), Some(Ordering::Less));
        assert_eq!(float.compare(Number::I64(big)), Some(Ordering::Equal));
        assert_eq!(
            Number::U64(u64::MAX).compare(Number::F64(u64::MAX as f64)),
            Some(Ordering::Less)
        );
        assert_eq!(Number::I64(2).compare(Number::F64(2.5)), Some(Ordering::Less));
        assert_eq!(
            Number::I64(-2).compare(Number::F64(-2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Number::I64(i64::MAX).compare(Number::F64(f64::INFINITY)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Number::U64(0).compare(Number::F64(f64::NEG_INFINITY)),
            Some(Ordering::Greater)
        );

        let mut numbers = vec![
            Number::I64(big + 1),
            float,
            Number::I64(big),
            Number::F64(f64::NAN),
        ];
        numbers.sort_by(|a, b| a.total_cmp(*b));
        assert_eq!(numbers[3].to_string(), "NaN");
        assert_eq!(numbers[2], Number::I64(big + 1));
    }

    #[test]
    fn number_total_cmp_orders_nan_last() {
        assert_eq!(Number::F64(f64::NAN).compare(Number::F64(1.0)), None);
        assert_eq!(
            Number::F64(f64::NAN).total_cmp(Number::F64(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            Number::F64(1.0).total_cmp(Number::F64(f64::NAN)),
            Ordering::Less
        );
    }

    #[test]
    fn number_display() {
        assert_eq!(Number::I64(-3).to_string(), "-3");
        assert_eq!(Number::F64(2.5).to_string(), "2.5");
    }

    #[test]
    fn timestamp_conversions() {
        assert_eq!(Timestamp::from_secs(1).as_millis(), 1000);
        assert_eq!(Timestamp::from_millis(5000).as_secs(), 5);
    }
}
