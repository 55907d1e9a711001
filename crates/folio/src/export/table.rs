//! Export tables: typed columns and cells ready for a report renderer.

use std::fmt;

use folio_seeker::{
    FormatterRegistry, Locale, Number, PropertyPath, PropertyResolver, Record, Timestamp, Value,
    ValueType,
};
use serde::Serialize;

use super::spec::ExportFieldSpec;
use crate::error::{PagesError, Result};

/// Report column data type for columns without a formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Timestamp,
    Bool,
    Enum,
}

/// Maps a runtime value type to a report data type.
pub trait TypeDetector {
    /// `None` when the type has no report representation.
    fn detect(&self, value_type: ValueType) -> Option<DataType>;
}

/// Detects the naturally ordered types; records and opaque types need a
/// formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTypeDetector;

impl TypeDetector for BuiltinTypeDetector {
    fn detect(&self, value_type: ValueType) -> Option<DataType> {
        match value_type {
            ValueType::String => Some(DataType::Text),
            ValueType::Number => Some(DataType::Number),
            ValueType::Timestamp => Some(DataType::Timestamp),
            ValueType::Bool => Some(DataType::Bool),
            ValueType::Enum => Some(DataType::Enum),
            ValueType::Record(_) | ValueType::Custom(_) => None,
        }
    }
}

/// How the cells of a column are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "camelCase")]
pub enum ColumnType {
    /// Rendered as text by the formatter registered for the type.
    Formatted(ValueType),
    /// Exported as is.
    Detected(DataType),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub header: Option<String>,
    pub field_path: String,
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Header text, or the field path when the column has none.
    pub fn label(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.field_path)
    }
}

/// One exported value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(Number),
    Bool(bool),
    Timestamp(Timestamp),
    Empty,
}

impl Cell {
    fn from_value(value: &Value<'_>) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::String(s) => Cell::Text(s.to_string()),
            Value::Number(n) => Cell::Number(*n),
            Value::Timestamp(t) => Cell::Timestamp(*t),
            Value::Bool(b) => Cell::Bool(*b),
            Value::Enum(d) => Cell::Number(Number::from(*d)),
            other => Cell::Text(other.display_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Timestamp(t) => write!(f, "{}", t.as_millis()),
            Cell::Empty => Ok(()),
        }
    }
}

/// A list prepared for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportTable {
    pub title: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Vec<Cell>>,
}

impl ExportTable {
    /// Column labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnDescriptor::label)
    }
}

/// Builds [`ExportTable`]s from records and an export spec.
pub struct ExportCoordinator<'e> {
    resolver: &'e PropertyResolver,
    formatters: &'e FormatterRegistry,
    detector: &'e dyn TypeDetector,
    locale: &'e Locale,
}

impl<'e> ExportCoordinator<'e> {
    pub fn new(
        resolver: &'e PropertyResolver,
        formatters: &'e FormatterRegistry,
        locale: &'e Locale,
    ) -> Self {
        ExportCoordinator {
            resolver,
            formatters,
            detector: &BuiltinTypeDetector,
            locale,
        }
    }

    pub fn with_detector(mut self, detector: &'e dyn TypeDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Prepares `records` for export.
    ///
    /// Column types come from the first record resolving a type for the
    /// field. A type with a registered formatter gives a formatted column;
    /// any other type must be known to the detector. `headers` holds the
    /// resolved header of each column, as returned by
    /// [`ExportFieldSpec::resolve_headers`].
    pub fn prepare<R: Record>(
        &self,
        records: &[R],
        spec: &ExportFieldSpec,
        headers: &[Option<String>],
        title: Option<&str>,
    ) -> Result<ExportTable> {
        if records.is_empty() {
            return Err(PagesError::EmptyExportList);
        }

        let columns = spec
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| {
                Ok(ColumnDescriptor {
                    header: headers.get(index).cloned().flatten(),
                    field_path: field.path.to_string(),
                    column_type: self.column_type(records, &field.path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let rows = records
            .iter()
            .map(|record| {
                spec.paths()
                    .zip(&columns)
                    .map(|(path, column)| {
                        let value = self.resolver.resolve(record, path)?;
                        Ok(self.cell(&value, column.column_type))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            columns = columns.len(),
            rows = rows.len(),
            title = title.unwrap_or(""),
            "prepared export table"
        );

        Ok(ExportTable {
            title: title.map(str::to_string),
            columns,
            rows,
        })
    }

    fn column_type<R: Record>(&self, records: &[R], path: &PropertyPath) -> Result<ColumnType> {
        let mut value_type = None;
        for record in records {
            value_type = self.resolver.resolve_type(record, path)?;
            if value_type.is_some() {
                break;
            }
        }
        let unknown = || PagesError::UnknownColumnType {
            field: path.to_string(),
        };
        let value_type = value_type.ok_or_else(unknown)?;

        if self.formatters.find_for_type(value_type).is_some() {
            return Ok(ColumnType::Formatted(value_type));
        }
        self.detector
            .detect(value_type)
            .map(ColumnType::Detected)
            .ok_or_else(unknown)
    }

    fn cell(&self, value: &Value<'_>, column_type: ColumnType) -> Cell {
        if value.is_null() {
            return Cell::Empty;
        }
        match column_type {
            ColumnType::Formatted(_) => match self.formatters.find(value) {
                Some(formatter) => Cell::Text(formatter.format(value, self.locale)),
                None => Cell::from_value(value),
            },
            ColumnType::Detected(_) => Cell::from_value(value),
        }
    }
}

impl fmt::Debug for ExportCoordinator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportCoordinator")
            .field("formatters", self.formatters)
            .field("locale", self.locale)
            .finish_non_exhaustive()
    }
}
