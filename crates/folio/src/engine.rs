//! Request-level facade over pagination, sorting and export.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use folio_seeker::{
    FormatterRegistry, Locale, PropertyPath, PropertyResolver, Record, SortEngine,
};
use serde::Serialize;

use crate::config::PagesConfig;
use crate::error::Result;
use crate::export::{ExportCoordinator, ExportFormat, ExportLink, ExportSpecParser, ExportTable};
use crate::messages::{ExpressionEvaluator, LiteralEvaluator, MessageSource, NoMessages};
use crate::navigation::{
    NavigationCalculator, NavigationLinkSet, NavigationTexts, DEFAULT_MAX_LINKED_PAGES,
};
use crate::paged::{parse_page_index, parse_page_size};
use crate::scope::{IterationSource, RequestScope};
use crate::sort_link::{requested_sort, SortLink};
use crate::url::RequestUrl;

/// The current page of a list with its navigation bar.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView<'s, R> {
    /// Index range of `items` within the whole list.
    pub range: Range<usize>,
    pub items: &'s [R],
    pub navigation: NavigationLinkSet,
    pub texts: NavigationTexts,
}

/// What an export element produces for the current request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// The request asks for this format: the table to render.
    Table {
        format: ExportFormat,
        file_name: String,
        table: ExportTable,
    },
    /// Any other request: the link requesting this format.
    Link(ExportLink),
}

/// Attributes of an export element.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Export field spec, e.g. `"name, category.name:category"`.
    pub spec: &'a str,
    pub format: ExportFormat,
    pub title: Option<&'a str>,
}

/// Shared, immutable engine. Per-request state lives in a [`RequestScope`],
/// including the request locale; without one the configured locale applies.
///
/// ```
/// use folio::{IterationSource, PagesConfig, PagesEngine, RequestScope, RequestUrl};
/// use folio_seeker::FormatterRegistry;
///
/// fn numbers() -> Vec<u32> {
///     (1..=25).collect()
/// }
///
/// let engine = PagesEngine::new(PagesConfig::default(), FormatterRegistry::new()).unwrap();
/// let mut scope = RequestScope::new();
/// let url = RequestUrl::parse("/numbers?page=1");
///
/// let view = engine
///     .paginate(&mut scope, "numbers", || IterationSource::from(numbers()), Some("10"), &url)
///     .unwrap();
/// assert_eq!(view.items.first(), Some(&11));
/// assert_eq!(view.texts.result_count, "Showing 11 - 20 of 25 results");
/// ```
pub struct PagesEngine {
    config: PagesConfig,
    formatters: FormatterRegistry,
    resolver: PropertyResolver,
    messages: Arc<dyn MessageSource + Send + Sync>,
    evaluator: Arc<dyn ExpressionEvaluator + Send + Sync>,
    max_linked_pages: usize,
}

impl PagesEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: PagesConfig, formatters: FormatterRegistry) -> Result<Self> {
        config.validate()?;
        Ok(PagesEngine {
            config,
            formatters,
            resolver: PropertyResolver::new(),
            messages: Arc::new(NoMessages),
            evaluator: Arc::new(LiteralEvaluator),
            max_linked_pages: DEFAULT_MAX_LINKED_PAGES,
        })
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageSource + Send + Sync>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_evaluator(
        mut self,
        evaluator: Arc<dyn ExpressionEvaluator + Send + Sync>,
    ) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_max_linked_pages(mut self, max: usize) -> Self {
        self.max_linked_pages = max;
        self
    }

    pub fn config(&self) -> &PagesConfig {
        &self.config
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    fn locale_for(&self, scope: &RequestScope) -> Locale {
        scope.locale().unwrap_or(&self.config.locale).clone()
    }

    /// Paginates the list cached under `key`.
    ///
    /// `page_size` is the view's page size attribute; without one the
    /// configured default applies. The page index is read from the page
    /// parameter of `url` and left unchanged when absent.
    pub fn paginate<'s, R, F>(
        &self,
        scope: &'s mut RequestScope,
        key: &str,
        supplier: F,
        page_size: Option<&str>,
        url: &RequestUrl,
    ) -> Result<PaginationView<'s, R>>
    where
        R: 'static,
        F: FnOnce() -> IterationSource<R>,
    {
        let size = page_size
            .map(parse_page_size)
            .transpose()?
            .unwrap_or(self.config.default_page_size);
        let locale = self.locale_for(scope);
        let list = scope.get_or_create(key, supplier)?;
        list.set_page_size(size)?;
        if let Some(raw) = url.param(&self.config.page_parameter) {
            list.set_page(parse_page_index(&raw)?);
        }

        let navigation = NavigationCalculator::new(&self.config)
            .with_max_linked_pages(self.max_linked_pages)
            .compute_for(list, url);
        let texts =
            NavigationTexts::render(&navigation, &self.config, &*self.messages, &locale);
        let list: &'s _ = list;

        Ok(PaginationView {
            range: list.metrics().range(),
            items: list.page_items(),
            navigation,
            texts,
        })
    }

    /// Applies the sort requested for `field` to the list cached under
    /// `key` and returns the column's sort link.
    ///
    /// The cached list is sorted in place, so pagination and export of the
    /// same key see the sorted order.
    pub fn sort<R, F>(
        &self,
        scope: &mut RequestScope,
        key: &str,
        supplier: F,
        field: &str,
        url: &RequestUrl,
    ) -> Result<SortLink>
    where
        R: Record + 'static,
        F: FnOnce() -> IterationSource<R>,
    {
        let field = PropertyPath::parse(field.trim())?;
        let state = requested_sort(&field, url, &self.config);
        let locale = self.locale_for(scope);
        let list = scope.get_or_create(key, supplier)?;
        SortEngine::new(&self.resolver, &self.formatters, &locale)
            .apply_if_requested(list.original_mut(), &state)?;
        Ok(SortLink::build(&state, url, &self.config))
    }

    /// Exports the list cached under `key` when `url` requests the format,
    /// otherwise returns the link requesting it.
    ///
    /// The whole list is exported, not just the current page.
    pub fn export<R, F>(
        &self,
        scope: &mut RequestScope,
        key: &str,
        supplier: F,
        request: &ExportRequest<'_>,
        url: &RequestUrl,
    ) -> Result<ExportOutcome>
    where
        R: Record + 'static,
        F: FnOnce() -> IterationSource<R>,
    {
        let locale = &self.locale_for(scope);
        let requested = url
            .param(&self.config.export_parameter)
            .is_some_and(|value| value.trim() == request.format.as_str());
        if !requested {
            return Ok(ExportOutcome::Link(ExportLink::build(
                request.format,
                url,
                &self.config,
                &*self.messages,
                locale,
            )));
        }

        let spec = ExportSpecParser.parse(request.spec)?;
        let headers = spec.resolve_headers(&*self.messages, &*self.evaluator, locale)?;
        let list = scope.get_or_create(key, supplier)?;
        let table = ExportCoordinator::new(&self.resolver, &self.formatters, locale).prepare(
            list.original(),
            &spec,
            &headers,
            request.title,
        )?;

        Ok(ExportOutcome::Table {
            format: request.format,
            file_name: request.format.file_name(request.title),
            table,
        })
    }
}

impl fmt::Debug for PagesEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagesEngine")
            .field("config", &self.config)
            .field("formatters", &self.formatters)
            .field("max_linked_pages", &self.max_linked_pages)
            .finish_non_exhaustive()
    }
}
