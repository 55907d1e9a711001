//! Navigation bar arithmetic.
//!
//! [`NavigationCalculator`] turns page metrics into a serializable
//! [`NavigationLinkSet`]: which links to show, where they point, and the
//! parameters of the result count text. [`NavigationTexts`] renders the
//! texts through a [`MessageSource`].

use folio_seeker::Locale;
use serde::Serialize;

use crate::config::PagesConfig;
use crate::error::Result;
use crate::messages::{self, MessageSource};
use crate::paged::{PageMetrics, PagedList};
use crate::url::RequestUrl;

pub const DEFAULT_MAX_LINKED_PAGES: usize = 10;

/// Result count shown next to the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResultCount {
    /// The list is empty.
    None,
    /// Exactly one record.
    One,
    /// 1-based inclusive range of the page within the total.
    Range {
        first: usize,
        last: usize,
        total: usize,
    },
}

/// Link targets; `None` when the link is hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetUrls {
    pub first: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub last: Option<String>,
}

/// One entry of the linked page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    /// 0-based page index.
    pub index: usize,
    /// 1-based page number.
    pub display: usize,
    pub url: String,
    pub current: bool,
}

/// View model of a navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationLinkSet {
    /// More than one page exists.
    pub show_bar: bool,
    pub show_first: bool,
    pub show_previous: bool,
    pub show_next: bool,
    pub show_last: bool,
    /// 1-based current page.
    pub current_page_display: usize,
    pub total_pages_display: usize,
    pub result_count: ResultCount,
    pub target_urls: TargetUrls,
    pub linked_pages: Vec<PageLink>,
}

/// Computes navigation link sets.
#[derive(Debug, Clone)]
pub struct NavigationCalculator<'c> {
    config: &'c PagesConfig,
    max_linked_pages: usize,
}

impl<'c> NavigationCalculator<'c> {
    pub fn new(config: &'c PagesConfig) -> Self {
        NavigationCalculator {
            config,
            max_linked_pages: DEFAULT_MAX_LINKED_PAGES,
        }
    }

    /// Size of the linked page window; 0 disables it.
    pub fn with_max_linked_pages(mut self, max: usize) -> Self {
        self.max_linked_pages = max;
        self
    }

    /// Computes the link set for one page. A zero page size fails.
    pub fn compute(
        &self,
        page_index: usize,
        page_size: usize,
        total_count: usize,
        url: &RequestUrl,
    ) -> Result<NavigationLinkSet> {
        let metrics = PageMetrics::new(page_index, page_size, total_count)?;
        Ok(self.links_for(&metrics, url))
    }

    /// Computes the link set for the current page of `list`.
    pub fn compute_for<R>(&self, list: &PagedList<R>, url: &RequestUrl) -> NavigationLinkSet {
        self.links_for(&list.metrics(), url)
    }

    fn links_for(&self, metrics: &PageMetrics, url: &RequestUrl) -> NavigationLinkSet {
        let page = metrics.page();
        let page_count = metrics.page_count();
        let show_back = !metrics.is_first_page();
        let show_forward = !metrics.is_last_page();
        let link = |target: usize| self.page_url(url, target);

        let result_count = match (metrics.total_count(), metrics.last_index_on_page()) {
            (0, _) | (_, None) => ResultCount::None,
            (1, _) => ResultCount::One,
            (total, Some(last)) => ResultCount::Range {
                first: metrics.first_index_on_page() + 1,
                last: last + 1,
                total,
            },
        };

        let target_urls = TargetUrls {
            first: show_back.then(|| link(0)),
            previous: show_back.then(|| link(page - 1)),
            next: show_forward.then(|| link(page + 1)),
            last: show_forward.then(|| link(page_count - 1)),
        };

        let linked_pages = metrics
            .linked_pages(self.max_linked_pages)
            .into_iter()
            .map(|index| PageLink {
                index,
                display: index + 1,
                url: link(index),
                current: index == page,
            })
            .collect();

        NavigationLinkSet {
            show_bar: page_count > 1,
            show_first: show_back,
            show_previous: show_back,
            show_next: show_forward,
            show_last: show_forward,
            // An empty list has no page to be on
            current_page_display: (page + 1).min(page_count),
            total_pages_display: page_count,
            result_count,
            target_urls,
            linked_pages,
        }
    }

    fn page_url(&self, url: &RequestUrl, page: usize) -> String {
        url.with_param(&self.config.page_parameter, &page.to_string())
            .to_string()
    }
}

/// Rendered navigation texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTexts {
    pub first: String,
    pub previous: String,
    pub page: String,
    pub next: String,
    pub last: String,
    pub result_count: String,
}

impl NavigationTexts {
    /// Resolves every text of `links` through `source`, falling back to the
    /// built-in English defaults.
    pub fn render(
        links: &NavigationLinkSet,
        config: &PagesConfig,
        source: &dyn MessageSource,
        locale: &Locale,
    ) -> Self {
        let keys = &config.messages;
        let text = |key: &str, default: &str, args: &[String]| {
            messages::message_or_default(source, key, locale, default, args)
        };

        let result_count = match links.result_count {
            ResultCount::None => text(&keys.none, messages::DEFAULT_NONE, &[]),
            ResultCount::One => text(&keys.one_result, messages::DEFAULT_ONE_RESULT, &[]),
            ResultCount::Range { first, last, total } => text(
                &keys.results,
                messages::DEFAULT_RESULTS,
                &[first.to_string(), last.to_string(), total.to_string()],
            ),
        };

        NavigationTexts {
            first: text(&keys.first, messages::DEFAULT_FIRST, &[]),
            previous: text(&keys.previous, messages::DEFAULT_PREVIOUS, &[]),
            page: text(
                &keys.page,
                messages::DEFAULT_PAGE,
                &[
                    links.current_page_display.to_string(),
                    links.total_pages_display.to_string(),
                ],
            ),
            next: text(&keys.next, messages::DEFAULT_NEXT, &[]),
            last: text(&keys.last, messages::DEFAULT_LAST, &[]),
            result_count,
        }
    }
}
