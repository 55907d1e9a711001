//! Separators between groups of iterated items.

use std::str::FromStr;

use crate::error::{PagesError, Result};

/// A separator inserted before every `interval`-th item, from an attribute
/// of the form `"<itemVar>, <interval>"`.
///
/// ```
/// use folio::Separator;
///
/// let separator: Separator = "product, 3".parse().unwrap();
/// let due: Vec<usize> = (1..=10).filter(|&n| separator.is_due(n)).collect();
/// assert_eq!(due, [4, 7, 10]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    item_var: String,
    interval: usize,
}

impl Separator {
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |reason| PagesError::MalformedSeparator {
            spec: raw.to_string(),
            reason,
        };

        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [item_var, interval] = parts.as_slice() else {
            return Err(malformed("expected '<itemVar>, <interval>'"));
        };
        if item_var.is_empty() {
            return Err(malformed("item variable is empty"));
        }
        let interval: usize = interval
            .parse()
            .map_err(|_| malformed("interval is not a number"))?;
        if interval == 0 {
            return Err(malformed("interval must be positive"));
        }

        Ok(Separator {
            item_var: item_var.to_string(),
            interval,
        })
    }

    /// Name of the iteration variable.
    pub fn item_var(&self) -> &str {
        &self.item_var
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Whether a separator goes before the item with 1-based `count`.
    pub fn is_due(&self, count: usize) -> bool {
        count > 1 && (count - 1) % self.interval == 0
    }
}

impl FromStr for Separator {
    type Err = PagesError;

    fn from_str(s: &str) -> Result<Self> {
        Separator::parse(s)
    }
}
