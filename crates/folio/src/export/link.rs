//! Export formats and export links.

use std::fmt;
use std::str::FromStr;

use folio_seeker::Locale;
use serde::Serialize;

use crate::config::PagesConfig;
use crate::error::{PagesError, Result};
use crate::messages::MessageSource;
use crate::url::RequestUrl;

const DEFAULT_FILE_NAME: &str = "export";

/// Report formats an export link can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Excel, ExportFormat::Csv];

    /// Value of the export request parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xls",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn css_class(self) -> String {
        format!("export-{}", self.as_str())
    }

    /// Message key of the link text.
    pub fn message_key(self, config: &PagesConfig) -> &str {
        let keys = &config.messages;
        match self {
            ExportFormat::Pdf => &keys.export_pdf,
            ExportFormat::Excel => &keys.export_excel,
            ExportFormat::Csv => &keys.export_csv,
        }
    }

    /// Download file name for a report titled `title`.
    ///
    /// ```
    /// use folio::export::ExportFormat;
    ///
    /// assert_eq!(ExportFormat::Csv.file_name(Some("Q3 sales (EU)")), "Q3_sales_EU.csv");
    /// assert_eq!(ExportFormat::Excel.file_name(None), "export.xls");
    /// ```
    pub fn file_name(self, title: Option<&str>) -> String {
        let stem = title.map_or_else(|| DEFAULT_FILE_NAME.to_string(), simplify);
        format!("{}.{}", stem, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PagesError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| PagesError::UnknownExportFormat(s.to_string()))
    }
}

/// Keeps letters and digits, turns spaces into `_` and drops the rest.
fn simplify(title: &str) -> String {
    let simple: String = title
        .chars()
        .filter_map(|ch| match ch {
            ' ' => Some('_'),
            ch if ch.is_alphanumeric() => Some(ch),
            _ => None,
        })
        .collect();
    if simple.is_empty() {
        "_".to_string()
    } else {
        simple
    }
}

/// A link requesting an export of the current view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLink {
    pub format: ExportFormat,
    pub href: String,
    pub class: String,
    pub text: String,
    /// Id of the element grouping the export links of a view.
    pub container_id: String,
}

impl ExportLink {
    /// Builds the link for `format` from the current request URL. A
    /// previous export parameter is replaced.
    ///
    /// The text is the configured message for the format, or the format
    /// name when the source has none.
    pub fn build(
        format: ExportFormat,
        url: &RequestUrl,
        config: &PagesConfig,
        source: &dyn MessageSource,
        locale: &Locale,
    ) -> Self {
        let href = url
            .without_params(&[config.export_parameter.as_str()])
            .with_appended(&config.export_parameter, format.as_str())
            .to_string();
        let text = source
            .message(format.message_key(config), locale)
            .unwrap_or_else(|| format.as_str().to_string());
        ExportLink {
            format,
            href,
            class: format.css_class(),
            text,
            container_id: config.export_div_id.clone(),
        }
    }
}
