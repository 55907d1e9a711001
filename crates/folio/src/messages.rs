//! Message lookup and interpolation.
//!
//! Texts shown by navigation bars, export links and export headers come
//! from an application-supplied [`MessageSource`]. Every navigation text has
//! a built-in default used when the source has no mapping, so an engine
//! without messages still renders a usable bar.

use std::collections::HashMap;

use folio_seeker::Locale;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::Result;

pub const DEFAULT_FIRST: &str = "First";
pub const DEFAULT_PREVIOUS: &str = "Previous";
pub const DEFAULT_PAGE: &str = "Page {0} of {1}";
pub const DEFAULT_NEXT: &str = "Next";
pub const DEFAULT_LAST: &str = "Last";
pub const DEFAULT_ONE_RESULT: &str = "1 result";
pub const DEFAULT_RESULTS: &str = "Showing {0} - {1} of {2} results";
pub const DEFAULT_NONE: &str = "No result found";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid"));

/// Resolves message keys to localized texts.
pub trait MessageSource {
    /// The text for `key` in `locale`, `None` if there is no mapping.
    fn message(&self, key: &str, locale: &Locale) -> Option<String>;
}

/// A flat key → text map, used for every locale.
impl MessageSource for HashMap<String, String> {
    fn message(&self, key: &str, _locale: &Locale) -> Option<String> {
        self.get(key).cloned()
    }
}

/// A source without any mapping; every lookup falls back to defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMessages;

impl MessageSource for NoMessages {
    fn message(&self, _key: &str, _locale: &Locale) -> Option<String> {
        None
    }
}

/// Evaluates dynamic header expressions (`$...`) to message keys.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expression: &str) -> Result<String>;
}

/// Evaluator that treats `${name}` and `$name` as the literal key `name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralEvaluator;

impl ExpressionEvaluator for LiteralEvaluator {
    fn evaluate(&self, expression: &str) -> Result<String> {
        let body = expression.strip_prefix('$').unwrap_or(expression);
        let body = body
            .strip_prefix('{')
            .and_then(|b| b.strip_suffix('}'))
            .unwrap_or(body);
        Ok(body.trim().to_string())
    }
}

/// Replaces `{n}` placeholders with `args[n]`. Unknown indexes are kept.
///
/// ```
/// use folio::messages::interpolate;
///
/// assert_eq!(interpolate("Page {0} of {1}", &["2", "5"]), "Page 2 of 5");
/// assert_eq!(interpolate("{3}", &["a"]), "{3}");
/// ```
pub fn interpolate<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map_or_else(|| caps[0].to_string(), |arg| arg.as_ref().to_string())
        })
        .into_owned()
}

/// Looks `key` up, falls back to `default`, then interpolates `args`.
pub fn message_or_default<S: AsRef<str>>(
    source: &dyn MessageSource,
    key: &str,
    locale: &Locale,
    default: &str,
    args: &[S],
) -> String {
    let template = source
        .message(key, locale)
        .unwrap_or_else(|| default.to_string());
    interpolate(&template, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_positional_args() {
        assert_eq!(
            interpolate(DEFAULT_RESULTS, &["11", "20", "25"]),
            "Showing 11 - 20 of 25 results"
        );
        assert_eq!(interpolate("{0}{0}", &["x"]), "xx");
        assert_eq!(interpolate("no args", &[] as &[&str]), "no args");
    }

    #[test]
    fn falls_back_to_default_text() {
        let source = HashMap::from([("nav.page".to_string(), "Página {0} de {1}".to_string())]);
        let locale = Locale::new("es");

        assert_eq!(
            message_or_default(&source, "nav.page", &locale, DEFAULT_PAGE, &["1", "3"]),
            "Página 1 de 3"
        );
        assert_eq!(
            message_or_default(&NoMessages, "nav.page", &locale, DEFAULT_PAGE, &["1", "3"]),
            "Page 1 of 3"
        );
    }

    #[test]
    fn literal_evaluator_strips_markers() {
        let eval = LiteralEvaluator;
        assert_eq!(eval.evaluate("${header.total}").unwrap(), "header.total");
        assert_eq!(eval.evaluate("$plain").unwrap(), "plain");
        assert_eq!(eval.evaluate("bare").unwrap(), "bare");
    }
}
