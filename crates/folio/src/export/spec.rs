//! Export field specifications.
//!
//! An export attribute lists the columns to export:
//!
//! ```text
//! name, category.name:category, formattedPrice:${totalHeader}
//! ```
//!
//! Each comma-separated token is a property path, optionally followed by
//! `:` and a header. Headers starting with `$` are expressions evaluated to
//! a message key; others are message keys used as they are.

use std::fmt;

use folio_seeker::{Locale, PropertyPath};
use serde::Serialize;

use crate::error::{PagesError, Result};
use crate::messages::{ExpressionEvaluator, MessageSource};

const EXPRESSION_MARKER: char = '$';

/// A column header as written in the spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Header {
    /// A message key, shown as is when unmapped.
    Key(String),
    /// An expression evaluating to a message key.
    Expression(String),
}

/// One exported column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportField {
    pub path: PropertyPath,
    pub header: Option<Header>,
}

/// Ordered export columns, one per spec token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportFieldSpec {
    fields: Vec<ExportField>,
}

impl ExportFieldSpec {
    pub fn fields(&self) -> &[ExportField] {
        &self.fields
    }

    pub fn paths(&self) -> impl Iterator<Item = &PropertyPath> {
        self.fields.iter().map(|field| &field.path)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any column names a header.
    pub fn has_headers(&self) -> bool {
        self.fields.iter().any(|field| field.header.is_some())
    }

    /// Resolves every header to display text.
    ///
    /// Expressions are evaluated to a key first. Keys are looked up in
    /// `source`; an unmapped key is shown as is. Columns without a header
    /// yield `None`.
    pub fn resolve_headers(
        &self,
        source: &dyn MessageSource,
        evaluator: &dyn ExpressionEvaluator,
        locale: &Locale,
    ) -> Result<Vec<Option<String>>> {
        self.fields
            .iter()
            .map(|field| {
                let key = match &field.header {
                    None => return Ok(None),
                    Some(Header::Key(key)) => key.clone(),
                    Some(Header::Expression(expr)) => evaluator.evaluate(expr)?,
                };
                Ok(Some(source.message(&key, locale).unwrap_or(key)))
            })
            .collect()
    }
}

impl fmt::Display for ExportFieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field.path)?;
            match &field.header {
                Some(Header::Key(text)) | Some(Header::Expression(text)) => write!(f, ":{}", text)?,
                None => {}
            }
        }
        Ok(())
    }
}

/// Parses export attributes into [`ExportFieldSpec`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportSpecParser;

impl ExportSpecParser {
    /// Parses `raw`. Empty tokens, paths or headers and invalid paths fail
    /// with [`PagesError::MalformedExportSpec`].
    ///
    /// ```
    /// use folio::export::{ExportSpecParser, Header};
    ///
    /// let spec = ExportSpecParser.parse("name, category.name:category").unwrap();
    /// assert_eq!(spec.len(), 2);
    /// assert_eq!(spec.fields()[1].header, Some(Header::Key("category".into())));
    /// ```
    pub fn parse(&self, raw: &str) -> Result<ExportFieldSpec> {
        let malformed = |reason: String| PagesError::MalformedExportSpec {
            spec: raw.to_string(),
            reason,
        };

        let fields = raw
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                if token.is_empty() {
                    return Err(malformed(format!("column {} is empty", index + 1)));
                }
                let (path, header) = match token.split_once(':') {
                    Some((path, header)) => (path.trim(), Some(header.trim())),
                    None => (token, None),
                };
                if path.is_empty() {
                    return Err(malformed(format!("column {} has no field path", index + 1)));
                }
                let path = PropertyPath::parse(path).map_err(|err| malformed(err.to_string()))?;
                let header = match header {
                    Some("") => {
                        return Err(malformed(format!("column {} has an empty header", index + 1)))
                    }
                    Some(text) if text.starts_with(EXPRESSION_MARKER) => {
                        Some(Header::Expression(text.to_string()))
                    }
                    Some(text) => Some(Header::Key(text.to_string())),
                    None => None,
                };
                Ok(ExportField { path, header })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ExportFieldSpec { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{LiteralEvaluator, NoMessages};
    use std::collections::HashMap;

    #[test]
    fn parses_paths_and_headers_in_order() {
        let spec = ExportSpecParser
            .parse("name, category.name:category, formattedPrice:total")
            .unwrap();

        let paths: Vec<_> = spec.paths().map(|p| p.as_str()).collect();
        assert_eq!(paths, ["name", "category.name", "formattedPrice"]);

        let headers: Vec<_> = spec.fields().iter().map(|f| f.header.clone()).collect();
        assert_eq!(
            headers,
            [
                None,
                Some(Header::Key("category".into())),
                Some(Header::Key("total".into())),
            ]
        );
        assert!(spec.has_headers());
    }

    #[test]
    fn header_splits_on_first_colon_only() {
        let spec = ExportSpecParser.parse("time:label:with:colons").unwrap();
        assert_eq!(
            spec.fields()[0].header,
            Some(Header::Key("label:with:colons".into()))
        );
    }

    #[test]
    fn dollar_headers_are_expressions() {
        let spec = ExportSpecParser.parse("price:${totalHeader}").unwrap();
        assert_eq!(
            spec.fields()[0].header,
            Some(Header::Expression("${totalHeader}".into()))
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for raw in ["", "name,", "name,,price", ":header", "name:", "bad-path", "a..b:x"] {
            assert!(
                matches!(
                    ExportSpecParser.parse(raw),
                    Err(PagesError::MalformedExportSpec { .. })
                ),
                "'{raw}' should be rejected"
            );
        }
    }

    #[test]
    fn resolves_headers_with_fallback_to_key() {
        let spec = ExportSpecParser
            .parse("name, category.name:header.category, price:${header.price}, stock:Stock")
            .unwrap();
        let messages = HashMap::from([
            ("header.category".to_string(), "Category".to_string()),
            ("header.price".to_string(), "Price".to_string()),
        ]);

        let headers = spec
            .resolve_headers(&messages, &LiteralEvaluator, &Locale::default())
            .unwrap();
        assert_eq!(
            headers,
            [
                None,
                Some("Category".to_string()),
                Some("Price".to_string()),
                Some("Stock".to_string()),
            ]
        );

        let unmapped = spec
            .resolve_headers(&NoMessages, &LiteralEvaluator, &Locale::default())
            .unwrap();
        assert_eq!(unmapped[1].as_deref(), Some("header.category"));
    }

    #[test]
    fn displays_back_to_spec_form() {
        let raw = "name, category.name:category";
        assert_eq!(ExportSpecParser.parse(raw).unwrap().to_string(), raw);
    }
}
