//! Session-local query state of the transaction list and its
//! translation into wire parameters
//!
//! Mutations only update in-memory state; issuing the fetch that
//! follows a state change is the controller's job.

use crate::catalog::{FilterCatalog, DEFAULT_FILTER_FIELD};
use crate::error::CoreResult;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Column the list is sorted on (exactly one at a time)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

impl SortConfig {
    /// The `ordering` wire parameter: the key, `-`-prefixed when
    /// descending
    pub fn ordering(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.key.clone(),
            SortDirection::Descending => format!("-{}", self.key),
        }
    }
}

impl Default for SortConfig {
    /// The view opens sorted by date, newest first
    fn default() -> Self {
        Self {
            key: DEFAULT_SORT_KEY.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// One user-added filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    /// Key of a catalog field
    pub field: String,
    /// Coerced wire value; empty until the user supplies one
    pub value: String,
}

/// Page sizes the view offers
pub const ROWS_PER_PAGE_CHOICES: [u32; 4] = [15, 30, 50, 100];

/// Initial page size
pub const DEFAULT_ROWS_PER_PAGE: u32 = 15;

/// Initial sort column
pub const DEFAULT_SORT_KEY: &str = "date";

/// Pagination state of the list
#[derive(Debug, Clone)]
pub struct PageState {
    /// 1-based page number
    pub current_page: u32,
    /// One of [`ROWS_PER_PAGE_CHOICES`]
    pub rows_per_page: u32,
    /// Last total reported by the server
    pub total_count: u64,
}

impl PageState {
    /// Number of pages at the current page size
    pub fn total_pages(&self) -> u32 {
        let rows = u64::from(self.rows_per_page.max(1));
        self.total_count.div_ceil(rows) as u32
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            total_count: 0,
        }
    }
}

/// Mutable query state owned by one list view for its lifetime
///
/// Nothing here is persisted; tearing the view down discards the
/// state.
#[derive(Debug, Clone)]
pub struct QueryState {
    catalog: FilterCatalog,
    pub sort: SortConfig,
    pub filters: Vec<ActiveFilter>,
    pub page: PageState,
}

impl QueryState {
    pub fn new(catalog: FilterCatalog) -> Self {
        Self {
            catalog,
            sort: SortConfig::default(),
            filters: Vec::new(),
            page: PageState::default(),
        }
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    /// Sort by `key`, toggling direction on a repeated key
    ///
    /// A newly chosen column starts ascending, even though the view's
    /// initial sort is descending by date.
    pub fn set_sort(&mut self, key: &str) {
        if self.sort.key == key {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort = SortConfig {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            };
        }
    }

    /// Append a new filter on the default free-text field with an
    /// empty value
    pub fn add_filter(&mut self) {
        self.filters.push(ActiveFilter {
            field: DEFAULT_FILTER_FIELD.to_string(),
            value: String::new(),
        });
    }

    /// Change the field of the filter at `index`
    ///
    /// The stored value resets to empty: switching filter type
    /// discards a stale, possibly type-incompatible value.
    pub fn set_filter_field(&mut self, index: usize, key: &str) -> CoreResult<()> {
        self.catalog.describe(key)?;
        if let Some(filter) = self.filters.get_mut(index) {
            filter.field = key.to_string();
            filter.value = String::new();
        }
        Ok(())
    }

    /// Store a coerced value on the filter at `index`
    ///
    /// Input that fails coercion leaves the stored value unchanged.
    pub fn set_filter_value(&mut self, index: usize, raw: &str) -> CoreResult<()> {
        let Some(filter) = self.filters.get(index) else {
            return Ok(());
        };
        match self.catalog.coerce(&filter.field, raw) {
            Ok(value) => {
                self.filters[index].value = value;
                Ok(())
            }
            Err(err) => {
                log::warn!("filter value rejected for '{}': {}", filter.field, err);
                Err(err)
            }
        }
    }

    /// Remove the filter at `index`; out of bounds is a no-op
    pub fn remove_filter(&mut self, index: usize) {
        if index < self.filters.len() {
            self.filters.remove(index);
        }
    }

    /// Jump to page `n` (1-based)
    ///
    /// No clamping happens here; callers only offer valid targets.
    pub fn set_page(&mut self, n: u32) {
        self.page.current_page = n;
    }

    /// Change the page size and return to the first page
    pub fn set_rows_per_page(&mut self, n: u32) {
        self.page.rows_per_page = n.max(1);
        self.page.current_page = 1;
    }

    /// Record the server-reported total and keep the current page in
    /// range
    pub fn record_total(&mut self, count: u64) {
        self.page.total_count = count;
        let last = self.page.total_pages().max(1);
        if self.page.current_page > last {
            self.page.current_page = last;
        }
        if self.page.current_page == 0 {
            self.page.current_page = 1;
        }
    }

    /// Translate the state into the flat parameter bag of one fetch
    ///
    /// `offset`/`limit`/`ordering` come first, then one parameter per
    /// active filter in list order. A repeated field key overwrites
    /// the earlier entry in place, and empty values are emitted like
    /// any other.
    pub fn wire_params(&self) -> Vec<(String, String)> {
        let offset = u64::from(self.page.current_page.saturating_sub(1))
            * u64::from(self.page.rows_per_page);
        let mut params = vec![
            ("offset".to_string(), offset.to_string()),
            ("limit".to_string(), self.page.rows_per_page.to_string()),
            ("ordering".to_string(), self.sort.ordering()),
        ];
        for filter in &self.filters {
            if let Some(existing) = params.iter_mut().find(|(key, _)| *key == filter.field) {
                existing.1 = filter.value.clone();
            } else {
                params.push((filter.field.clone(), filter.value.clone()));
            }
        }
        params
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(FilterCatalog::standard())
    }
}

// ==================== Tests ====================
