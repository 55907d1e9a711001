//! Sort state from the request and sortable column links.

use folio_seeker::{Direction, PropertyPath, SortState};
use serde::Serialize;

use crate::config::PagesConfig;
use crate::url::RequestUrl;

/// Reads the sort requested for `field`.
///
/// The direction comes from the sort type parameter only when the sort
/// parameter names this field; otherwise the field is unsorted. Any sort
/// type other than `desc` sorts ascending.
pub fn requested_sort(field: &PropertyPath, url: &RequestUrl, config: &PagesConfig) -> SortState {
    let direction = match url.param(&config.sort_parameter) {
        Some(sorted) if sorted.trim() == field.as_str() => url
            .param(&config.sort_type_parameter)
            .map_or(Direction::Unsorted, |kind| match Direction::from_param(&kind) {
                Some(Direction::Descending) => Direction::Descending,
                _ => Direction::Ascending,
            }),
        _ => Direction::Unsorted,
    };
    SortState::new(field.clone(), direction)
}

/// A sortable column header link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortLink {
    pub href: String,
    /// `sort-sortable`, `sort-asc` or `sort-desc`.
    pub class: &'static str,
    /// Direction the link requests.
    pub next: Direction,
}

impl SortLink {
    /// Builds the link toggling `state`: previous sort parameters are
    /// removed and the field with its next direction is appended.
    ///
    /// ```
    /// use folio::{PagesConfig, RequestUrl, SortLink};
    /// use folio_seeker::{PropertyPath, SortState};
    ///
    /// let state = SortState::ascending(PropertyPath::parse("name").unwrap());
    /// let url = RequestUrl::parse("/p?sort=name&sortType=asc&q=x");
    /// let link = SortLink::build(&state, &url, &PagesConfig::default());
    /// assert_eq!(link.href, "/p?q=x&sort=name&sortType=desc");
    /// assert_eq!(link.class, "sort-asc");
    /// ```
    pub fn build(state: &SortState, url: &RequestUrl, config: &PagesConfig) -> Self {
        let next = state.direction.toggled();
        let href = url
            .without_params(&[config.sort_parameter.as_str(), config.sort_type_parameter.as_str()])
            .with_appended(&config.sort_parameter, state.field.as_str())
            .with_appended(&config.sort_type_parameter, next.as_str())
            .to_string();
        let class = match state.direction {
            Direction::Unsorted => "sort-sortable",
            Direction::Ascending => "sort-asc",
            Direction::Descending => "sort-desc",
        };
        SortLink { href, class, next }
    }
}
