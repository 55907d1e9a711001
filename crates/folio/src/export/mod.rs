//! List export.
//!
//! An export runs in three steps:
//!
//! 1. [`ExportSpecParser`] parses the export attribute into columns.
//! 2. [`ExportCoordinator`] resolves every column against the list and
//!    types it, producing an [`ExportTable`].
//! 3. A [`ReportRenderer`] writes the table. [`CsvRenderer`] is built in.
//!
//! [`ExportLink`] builds the links that request an export of the current
//! view in one of the [`ExportFormat`]s.

mod link;
mod render;
mod spec;
mod table;

pub use link::{ExportFormat, ExportLink};
pub use render::{CsvRenderer, ReportRenderer};
pub use spec::{ExportField, ExportFieldSpec, ExportSpecParser, Header};
pub use table::{
    BuiltinTypeDetector, Cell, ColumnDescriptor, ColumnType, DataType, ExportCoordinator,
    ExportTable, TypeDetector,
};
