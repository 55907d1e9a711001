//! Pluggable, locale-aware formatting of property values.
//!
//! A [`TypeFormatter`] renders values of one [`ValueType`] as display strings.
//! Formatters serve two purposes: exported columns use their output, and
//! values without a natural order are sorted by their formatted text.
//!
//! Formatters are collected into a [`FormatterRegistry`] once, at engine
//! configuration time. Lookups walk the registry in insertion order and the
//! first formatter whose type equals the value's type wins.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SeekerError};
use crate::locale::Locale;
use crate::value::{Value, ValueType};

/// Renders values of one type as locale-aware strings.
///
/// # Example
///
/// ```
/// use folio_seeker::{Locale, TypeFormatter, Value, ValueType};
///
/// #[derive(Debug)]
/// struct Money { cents: i64 }
///
/// struct MoneyFormatter;
///
/// impl TypeFormatter for MoneyFormatter {
///     fn value_type(&self) -> ValueType {
///         ValueType::custom::<Money>()
///     }
///
///     fn format(&self, value: &Value<'_>, locale: &Locale) -> String {
///         let cents = value.downcast_ref::<Money>().map_or(0, |m| m.cents);
///         let sep = if locale.language() == "en" { '.' } else { ',' };
///         format!("{}{}{:02}", cents / 100, sep, cents % 100)
///     }
/// }
///
/// let price = Money { cents: 1999 };
/// assert_eq!(MoneyFormatter.format(&Value::Custom(&price), &Locale::new("de")), "19,99");
/// ```
pub trait TypeFormatter: Send + Sync {
    /// The type this formatter renders.
    fn value_type(&self) -> ValueType;

    /// Whether this formatter applies to `value`. Matching is exact on the type.
    fn matches(&self, value: &Value<'_>) -> bool {
        value.value_type() == Some(self.value_type())
    }

    /// Renders `value` for `locale`.
    fn format(&self, value: &Value<'_>, locale: &Locale) -> String;
}

/// Adapts a closure into a [`TypeFormatter`].
///
/// ```
/// use folio_seeker::{FnFormatter, Locale, TypeFormatter, Value, ValueType};
///
/// let yes_no = FnFormatter::new(ValueType::Bool, |value, _locale| {
///     if value.as_bool() == Some(true) { "yes".into() } else { "no".into() }
/// });
/// assert_eq!(yes_no.format(&Value::Bool(true), &Locale::default()), "yes");
/// ```
pub struct FnFormatter<F> {
    value_type: ValueType,
    format: F,
}

impl<F> FnFormatter<F>
where
    F: Fn(&Value<'_>, &Locale) -> String + Send + Sync,
{
    pub fn new(value_type: ValueType, format: F) -> Self {
        FnFormatter { value_type, format }
    }
}

impl<F> TypeFormatter for FnFormatter<F>
where
    F: Fn(&Value<'_>, &Locale) -> String + Send + Sync,
{
    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn format(&self, value: &Value<'_>, locale: &Locale) -> String {
        (self.format)(value, locale)
    }
}

impl<F> fmt::Debug for FnFormatter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormatter")
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

/// Ordered, immutable set of type formatters.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: Vec<Arc<dyn TypeFormatter>>,
}

impl FormatterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a formatter. Earlier formatters take precedence.
    pub fn with(mut self, formatter: impl TypeFormatter + 'static) -> Self {
        self.formatters.push(Arc::new(formatter));
        self
    }

    /// Appends an already shared formatter.
    pub fn with_shared(mut self, formatter: Arc<dyn TypeFormatter>) -> Self {
        self.formatters.push(formatter);
        self
    }

    /// First formatter matching `value`. Null never matches.
    pub fn find(&self, value: &Value<'_>) -> Option<&dyn TypeFormatter> {
        self.formatters
            .iter()
            .find(|f| f.matches(value))
            .map(|f| f.as_ref())
    }

    /// First formatter registered for `value_type`.
    pub fn find_for_type(&self, value_type: ValueType) -> Option<&dyn TypeFormatter> {
        self.formatters
            .iter()
            .find(|f| f.value_type() == value_type)
            .map(|f| f.as_ref())
    }

    /// Like [`find`](Self::find), but a missing formatter is an error.
    pub fn require(&self, value: &Value<'_>) -> Result<&dyn TypeFormatter> {
        self.find(value)
            .ok_or_else(|| SeekerError::TypeFormatterNotFound {
                value_type: value
                    .value_type()
                    .map_or_else(|| "null".to_string(), |t| t.to_string()),
            })
    }

    /// Number of registered formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Returns `true` if no formatter is registered.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.formatters.iter().map(|fmt| fmt.value_type()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Money(i64);

    #[derive(Debug)]
    struct Euros(i64);

    fn money_registry() -> FormatterRegistry {
        FormatterRegistry::new()
            .with(FnFormatter::new(ValueType::custom::<Money>(), |v, _| {
                format!("${}", v.downcast_ref::<Money>().map_or(0, |m| m.0))
            }))
            .with(FnFormatter::new(ValueType::Bool, |v, _| {
                let text = if v.as_bool() == Some(true) { "yes" } else { "no" };
                text.to_string()
            }))
    }

    #[test]
    fn finds_formatter_by_exact_type() {
        let registry = money_registry();
        let money = Money(5);
        let value = Value::Custom(&money);

        let formatter = registry.find(&value).expect("money formatter");
        assert_eq!(formatter.format(&value, &Locale::default()), "$5");

        let euros = Euros(5);
        assert!(registry.find(&Value::Custom(&euros)).is_none());
    }

    #[test]
    fn null_never_matches() {
        assert!(money_registry().find(&Value::Null).is_none());
    }

    #[test]
    fn first_registered_wins() {
        let registry = FormatterRegistry::new()
            .with(FnFormatter::new(ValueType::Bool, |_, _| "first".into()))
            .with(FnFormatter::new(ValueType::Bool, |_, _| "second".into()));

        let formatter = registry.find(&Value::Bool(true)).unwrap();
        assert_eq!(formatter.format(&Value::Bool(true), &Locale::default()), "first");
    }

    #[test]
    fn find_for_type() {
        let registry = money_registry();
        assert!(registry.find_for_type(ValueType::Bool).is_some());
        assert!(registry.find_for_type(ValueType::String).is_none());
    }

    #[test]
    fn require_reports_missing_type() {
        let registry = money_registry();
        let err = match registry.require(&Value::from("text")) {
            Err(err) => err,
            Ok(_) => panic!("string has no formatter"),
        };
        assert_eq!(
            err,
            SeekerError::TypeFormatterNotFound {
                value_type: "string".into()
            }
        );
    }

    #[test]
    fn registry_debug_lists_types() {
        let debug = format!("{:?}", money_registry());
        assert!(debug.contains("Bool"));
        assert_eq!(money_registry().len(), 2);
        assert!(FormatterRegistry::new().is_empty());
    }
}
