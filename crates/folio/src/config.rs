//! Engine configuration.
//!
//! [`PagesConfig`] holds request parameter names, the default page size, the
//! locale used for formatting and collation, and the message keys looked up
//! for navigation and export link texts. It is built once, validated, and
//! passed by reference to every component.
//!
//! Configuration can be deserialized (camelCase keys, every field optional)
//! or built from a flat property map using the same keys:
//!
//! ```
//! use std::collections::HashMap;
//! use folio::PagesConfig;
//!
//! let props = HashMap::from([
//!     ("pageParameter".to_string(), "p".to_string()),
//!     ("pagesdialect.next".to_string(), "nav.next".to_string()),
//! ]);
//! let config = PagesConfig::from_properties(&props).unwrap();
//! assert_eq!(config.page_parameter, "p");
//! assert_eq!(config.sort_parameter, "sort");
//! assert_eq!(config.messages.next, "nav.next");
//! ```

use std::collections::{HashMap, HashSet};

use folio_seeker::Locale;
use serde::{Deserialize, Serialize};

use crate::error::{PagesError, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Immutable engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagesConfig {
    /// Query parameter carrying the 0-based page index.
    pub page_parameter: String,
    /// Query parameter carrying the sort field.
    pub sort_parameter: String,
    /// Query parameter carrying the sort direction (`asc` / `desc`).
    pub sort_type_parameter: String,
    /// Query parameter whose value selects the export format.
    pub export_parameter: String,
    /// Id of the element export links are grouped under.
    pub export_div_id: String,
    /// Page size used when the view does not set one.
    pub default_page_size: usize,
    /// Locale for formatters and collation.
    pub locale: Locale,
    /// Message keys for navigation and export texts.
    pub messages: MessageKeys,
}

impl Default for PagesConfig {
    fn default() -> Self {
        PagesConfig {
            page_parameter: "page".to_string(),
            sort_parameter: "sort".to_string(),
            sort_type_parameter: "sortType".to_string(),
            export_parameter: "export".to_string(),
            export_div_id: "exportlinkcontainer".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            locale: Locale::default(),
            messages: MessageKeys::default(),
        }
    }
}

impl PagesConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_parameter(mut self, name: impl Into<String>) -> Self {
        self.page_parameter = name.into();
        self
    }

    pub fn with_sort_parameter(mut self, name: impl Into<String>) -> Self {
        self.sort_parameter = name.into();
        self
    }

    pub fn with_sort_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.sort_type_parameter = name.into();
        self
    }

    pub fn with_export_parameter(mut self, name: impl Into<String>) -> Self {
        self.export_parameter = name.into();
        self
    }

    pub fn with_export_div_id(mut self, id: impl Into<String>) -> Self {
        self.export_div_id = id.into();
        self
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_messages(mut self, messages: MessageKeys) -> Self {
        self.messages = messages;
        self
    }

    /// Builds a configuration from a flat property map.
    ///
    /// Recognized keys are the camelCase field names plus the
    /// `pagesdialect.*` message keys; unknown keys are ignored. The result
    /// is validated.
    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self> {
        let mut config = PagesConfig::default();
        for (key, value) in properties {
            let value = value.trim();
            match key.as_str() {
                "pageParameter" => config.page_parameter = value.to_string(),
                "sortParameter" => config.sort_parameter = value.to_string(),
                "sortTypeParameter" => config.sort_type_parameter = value.to_string(),
                "exportParameter" => config.export_parameter = value.to_string(),
                "exportDivId" => config.export_div_id = value.to_string(),
                "defaultPageSize" => {
                    config.default_page_size = value.parse().map_err(|_| {
                        PagesError::InvalidConfig(format!(
                            "defaultPageSize must be a positive integer, got '{}'",
                            value
                        ))
                    })?
                }
                "locale" => config.locale = Locale::new(value),
                other => {
                    if !config.messages.override_key(other, value) {
                        tracing::debug!(key = other, "ignoring unknown configuration property");
                    }
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty or clashing parameter names and a zero page size.
    pub fn validate(&self) -> Result<()> {
        let params = [
            ("pageParameter", &self.page_parameter),
            ("sortParameter", &self.sort_parameter),
            ("sortTypeParameter", &self.sort_type_parameter),
            ("exportParameter", &self.export_parameter),
        ];

        let mut seen = HashSet::new();
        for (field, name) in params {
            if name.trim().is_empty() {
                return Err(PagesError::InvalidConfig(format!("{} is empty", field)));
            }
            if !seen.insert(name.as_str()) {
                return Err(PagesError::InvalidConfig(format!(
                    "parameter name '{}' is used more than once",
                    name
                )));
            }
        }
        if self.export_div_id.trim().is_empty() {
            return Err(PagesError::InvalidConfig("exportDivId is empty".into()));
        }
        if self.default_page_size == 0 {
            return Err(PagesError::InvalidConfig(
                "defaultPageSize must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Message keys resolved through a [`MessageSource`](crate::MessageSource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageKeys {
    pub first: String,
    pub previous: String,
    pub page: String,
    pub next: String,
    pub last: String,
    pub one_result: String,
    pub results: String,
    pub none: String,
    pub export_pdf: String,
    pub export_excel: String,
    pub export_csv: String,
}

const FIRST_KEY: &str = "pagesdialect.first";
const PREVIOUS_KEY: &str = "pagesdialect.previous";
const PAGE_KEY: &str = "pagesdialect.page";
const NEXT_KEY: &str = "pagesdialect.next";
const LAST_KEY: &str = "pagesdialect.last";
const ONE_RESULT_KEY: &str = "pagesdialect.oneResult";
const RESULTS_KEY: &str = "pagesdialect.results";
const NONE_KEY: &str = "pagesdialect.none";
const EXPORT_PDF_KEY: &str = "pagesdialect.exportPdf";
const EXPORT_EXCEL_KEY: &str = "pagesdialect.exportExcel";
const EXPORT_CSV_KEY: &str = "pagesdialect.exportCsv";

impl Default for MessageKeys {
    fn default() -> Self {
        MessageKeys {
            first: FIRST_KEY.into(),
            previous: PREVIOUS_KEY.into(),
            page: PAGE_KEY.into(),
            next: NEXT_KEY.into(),
            last: LAST_KEY.into(),
            one_result: ONE_RESULT_KEY.into(),
            results: RESULTS_KEY.into(),
            none: NONE_KEY.into(),
            export_pdf: EXPORT_PDF_KEY.into(),
            export_excel: EXPORT_EXCEL_KEY.into(),
            export_csv: EXPORT_CSV_KEY.into(),
        }
    }
}

impl MessageKeys {
    /// Replaces the key registered under its default name. Returns `false`
    /// if `default_key` is not a message key.
    fn override_key(&mut self, default_key: &str, key: &str) -> bool {
        let slot = match default_key {
            FIRST_KEY => &mut self.first,
            PREVIOUS_KEY => &mut self.previous,
            PAGE_KEY => &mut self.page,
            NEXT_KEY => &mut self.next,
            LAST_KEY => &mut self.last,
            ONE_RESULT_KEY => &mut self.one_result,
            RESULTS_KEY => &mut self.results,
            NONE_KEY => &mut self.none,
            EXPORT_PDF_KEY => &mut self.export_pdf,
            EXPORT_EXCEL_KEY => &mut self.export_excel,
            EXPORT_CSV_KEY => &mut self.export_csv,
            _ => return false,
        };
        *slot = key.to_string();
        true
    }
}
