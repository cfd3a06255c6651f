//! Query-state controller for the paginated transaction list
//!
//! Four pieces cooperate here:
//! - [`catalog`]: the fixed registry of filterable fields and their
//!   value coercion rules
//! - [`query`]: the mutable sort/filter/page state and its
//!   translation into wire parameters
//! - [`paging`]: the pagination-window algorithm
//! - [`controller`]: one-fetch-per-change orchestration against a
//!   [`finview_client::TransactionSource`]

pub mod catalog;
pub mod controller;
pub mod error;
pub mod paging;
pub mod query;

pub use catalog::{FilterCatalog, FilterField, FilterValueKind, DEFAULT_FILTER_FIELD};
pub use controller::ListController;
pub use error::{CoreError, CoreResult};
pub use paging::{nav_state, page_window, NavState, PageItem};
pub use query::{
    ActiveFilter, PageState, QueryState, SortConfig, SortDirection, DEFAULT_ROWS_PER_PAGE,
    DEFAULT_SORT_KEY, ROWS_PER_PAGE_CHOICES,
};
