// ── Filtering and pagination ──
//
// Generic over the item type: anything that can expose a timestamp,
// search haystacks, and category/severity labels can be filtered and
// paged. Filters AND-compose and are order-independent; `now` is captured
// once per pass so a single pass is internally consistent.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use strum::{Display, EnumString};

use crate::model::{Alert, FirewallRule, SecurityEvent};

/// Time window tokens accepted by the time-range filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString,
)]
pub enum TimeRange {
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    LastDay,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    LastWeek,
    #[strum(serialize = "all")]
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// The window as a duration; `All` disables the filter.
    pub fn window(self) -> Option<Duration> {
        match self {
            Self::LastHour => Some(Duration::hours(1)),
            Self::LastDay => Some(Duration::hours(24)),
            Self::LastWeek => Some(Duration::days(7)),
            Self::All => None,
        }
    }
}

/// A category/severity selection: the `All` sentinel disables the filter,
/// `Only` matches the label case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse a selection token; the literal `all` (any case) is the
    /// disable sentinel.
    pub fn parse(token: &str) -> Self {
        if token.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(token.to_owned())
        }
    }

    fn matches(&self, label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted.eq_ignore_ascii_case(label),
        }
    }
}

/// An item that can pass through the filter/pager.
pub trait Pageable {
    /// Timestamp used by the time-range filter; `None` means the item only
    /// survives the `All` range.
    fn timestamp(&self) -> Option<DateTime<Utc>>;
    /// Text fields the search filter matches against (ANY-match).
    fn search_haystacks(&self) -> Vec<&str>;
    fn category_label(&self) -> String;
    fn severity_label(&self) -> String;
}

/// One rendered page of a filtered sequence.
#[derive(Debug)]
pub struct PageView<'a, T> {
    pub items: Vec<&'a T>,
    /// The clamped, effective page number (1-indexed).
    pub page: usize,
    pub total_pages: usize,
    /// Items surviving the filters, before paging.
    pub total_items: usize,
    pub page_size: usize,
}

/// Filter state plus pagination cursor.
///
/// Every filter or page-size mutation resets the cursor to page 1: a page
/// number carried across a filter change would address an undefined
/// position in the new result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPager {
    time_range: TimeRange,
    search: String,
    category: Selection,
    severity: Selection,
    page: usize,
    page_size: usize,
}

impl Default for FilterPager {
    fn default() -> Self {
        Self {
            time_range: TimeRange::All,
            search: String::new(),
            category: Selection::All,
            severity: Selection::All,
            page: 1,
            page_size: 10,
        }
    }
}

impl FilterPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    // ── Mutators (all reset to page 1) ───────────────────────────────

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_range = range;
        self.page = 1;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, selection: Selection) {
        self.category = selection;
        self.page = 1;
    }

    pub fn set_severity(&mut self, selection: Selection) {
        self.severity = selection;
        self.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    /// Request a page. Values outside `[1, total_pages]` are clamped when
    /// the page is computed.
    pub fn goto_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn requested_page(&self) -> usize {
        self.page
    }

    // ── Evaluation ───────────────────────────────────────────────────

    /// Apply the filters and return the current page. `now` is captured
    /// once here, not per item.
    pub fn page<'a, T: Pageable>(&self, items: &'a [T]) -> PageView<'a, T> {
        self.page_at(items, Utc::now())
    }

    /// Like [`page`](Self::page) with an explicit reference instant.
    pub fn page_at<'a, T: Pageable>(&self, items: &'a [T], now: DateTime<Utc>) -> PageView<'a, T> {
        let filtered: Vec<&T> = items.iter().filter(|i| self.matches(*i, now)).collect();

        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(self.page_size).max(1);
        let page = self.page.clamp(1, total_pages);

        let start = (page - 1) * self.page_size;
        let items: Vec<&T> = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        PageView {
            items,
            page,
            total_pages,
            total_items,
            page_size: self.page_size,
        }
    }

    /// Whether one item survives every active filter. Conjunction only:
    /// no clause depends on another having run.
    fn matches<T: Pageable>(&self, item: &T, now: DateTime<Utc>) -> bool {
        self.matches_time(item, now)
            && self.matches_search(item)
            && self.category.matches(&item.category_label())
            && self.severity.matches(&item.severity_label())
    }

    fn matches_time<T: Pageable>(&self, item: &T, now: DateTime<Utc>) -> bool {
        match self.time_range.window() {
            None => true,
            Some(window) => item
                .timestamp()
                .is_some_and(|ts| now.signed_duration_since(ts) <= window),
        }
    }

    fn matches_search<T: Pageable>(&self, item: &T) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        item.search_haystacks()
            .iter()
            .any(|hay| hay.to_lowercase().contains(&needle))
    }
}

// ── Pageable impls ───────────────────────────────────────────────────

impl Pageable for SecurityEvent {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    fn search_haystacks(&self) -> Vec<&str> {
        [
            self.signature.as_deref(),
            self.src_ip.as_deref(),
            self.dest_ip.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn category_label(&self) -> String {
        self.kind.to_string()
    }

    fn severity_label(&self) -> String {
        self.severity.band().to_string()
    }
}

impl Pageable for Alert {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![&self.event, &self.source, &self.details]
    }

    fn category_label(&self) -> String {
        self.category.to_string()
    }

    fn severity_label(&self) -> String {
        self.severity.to_string()
    }
}

impl Pageable for FirewallRule {
    /// Rules carry no per-item timestamp; only the `All` range shows them.
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![&self.summary, &self.source, &self.destination]
    }

    fn category_label(&self) -> String {
        self.direction().to_string()
    }

    fn severity_label(&self) -> String {
        self.severity().to_string()
    }
}
