//! The [`Record`] trait: named property access on application values.
//!
//! Records expose their properties by name. Dotted paths such as
//! `category.name` are resolved by [`PropertyResolver`](crate::PropertyResolver),
//! which walks nested records one segment at a time.

use crate::value::{Number, Value, ValueType};

/// Why a record could not produce a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The record has no property with this name.
    Unknown,
    /// The property exists but may not be read.
    Restricted,
    /// Reading the property failed.
    Failed(String),
}

/// Trait for values whose properties can be read by name.
///
/// # Example
///
/// ```
/// use folio_seeker::{AccessError, Record, Value};
///
/// struct Category {
///     name: String,
/// }
///
/// struct Product {
///     name: String,
///     category: Option<Category>,
///     active: bool,
/// }
///
/// impl Record for Category {
///     fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
///         match name {
///             "name" => Ok(Value::from(&self.name)),
///             _ => Err(AccessError::Unknown),
///         }
///     }
/// }
///
/// impl Record for Product {
///     fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
///         match name {
///             "name" => Ok(Value::from(&self.name)),
///             "category" => Ok(self
///                 .category
///                 .as_ref()
///                 .map_or(Value::Null, |c| Value::Record(c))),
///             "is_active" => Ok(Value::Bool(self.active)),
///             _ => Err(AccessError::Unknown),
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a property.
    ///
    /// Return [`AccessError::Unknown`] for names the record does not define,
    /// and `Ok(Value::Null)` for defined properties that are currently absent.
    fn property(&self, name: &str) -> Result<Value<'_>, AccessError>;

    /// Declared type of a property, consulted when its current value is null.
    fn declared_type(&self, _name: &str) -> Option<ValueType> {
        None
    }

    /// Name of the record's type, used in errors and as the accessor cache key.
    fn record_type(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// JSON objects are records: keys are properties, nested objects are nested
/// records, arrays are opaque.
impl Record for serde_json::Map<String, serde_json::Value> {
    fn property(&self, name: &str) -> Result<Value<'_>, AccessError> {
        let value = self.get(name).ok_or(AccessError::Unknown)?;
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => json_number(n),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Object(map) => Value::Record(map),
            array @ serde_json::Value::Array(_) => Value::Custom(array),
        })
    }

    fn record_type(&self) -> &'static str {
        "json object"
    }
}

fn json_number(n: &serde_json::Number) -> Value<'static> {
    if let Some(i) = n.as_i64() {
        Value::Number(Number::I64(i))
    } else if let Some(u) = n.as_u64() {
        Value::Number(Number::U64(u))
    } else {
        n.as_f64().map_or(Value::Null, |f| Value::Number(Number::F64(f)))
    }
}
