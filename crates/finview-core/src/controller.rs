//! List controller: owns the query state and the last fetched page
//!
//! One user action maps to one state mutation followed by one fetch.
//! The fetched page replaces the previous one as a unit; a failed
//! fetch keeps the previous page on screen.

use finview_client::{SourceRef, TransactionPage};

use crate::error::CoreResult;
use crate::paging::{nav_state, page_window, NavState, PageItem};
use crate::query::QueryState;

/// Controller of one mounted transaction list view
pub struct ListController {
    state: QueryState,
    source: SourceRef,
    result: Option<TransactionPage>,
}

impl ListController {
    /// Controller with default query state
    pub fn new(source: SourceRef) -> Self {
        Self::with_state(QueryState::default(), source)
    }

    /// Controller starting from a prepared query state
    pub fn with_state(state: QueryState, source: SourceRef) -> Self {
        Self {
            state,
            source,
            result: None,
        }
    }

    /// Read-only view of the query state, for control rendering
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// The last successfully fetched page, if any
    pub fn result(&self) -> Option<&TransactionPage> {
        self.result.as_ref()
    }

    /// Pagination controls for the current state
    pub fn window(&self) -> Vec<PageItem> {
        page_window(self.state.page.current_page, self.state.page.total_pages())
    }

    /// First/Previous/Next/Last control state
    pub fn nav(&self) -> NavState {
        nav_state(self.state.page.current_page, self.state.page.total_pages())
    }

    /// Issue one fetch for the current state
    ///
    /// On success the result page and the server-reported total are
    /// replaced together. On failure the previous page stays, the
    /// error is logged and returned.
    pub fn refresh(&mut self) -> CoreResult<()> {
        let params = self.state.wire_params();
        match self.source.fetch_transactions(&params) {
            Ok(page) => {
                self.state.record_total(page.count);
                self.result = Some(page);
                Ok(())
            }
            Err(err) => {
                log::error!("transaction fetch failed: {}", err);
                Err(err.into())
            }
        }
    }

    // ==================== View Event Handlers ====================
    //
    // Each handler applies one mutation and refetches, mirroring the
    // view's event wiring. A rejected mutation skips the fetch.

    /// Sort-column click
    pub fn sort_by(&mut self, key: &str) -> CoreResult<()> {
        self.state.set_sort(key);
        self.refresh()
    }

    /// "Add filter" click
    pub fn add_filter(&mut self) -> CoreResult<()> {
        self.state.add_filter();
        self.refresh()
    }

    /// Filter field selection
    pub fn set_filter_field(&mut self, index: usize, key: &str) -> CoreResult<()> {
        self.state.set_filter_field(index, key)?;
        self.refresh()
    }

    /// Filter value input
    pub fn set_filter_value(&mut self, index: usize, raw: &str) -> CoreResult<()> {
        self.state.set_filter_value(index, raw)?;
        self.refresh()
    }

    /// Filter removal click
    pub fn remove_filter(&mut self, index: usize) -> CoreResult<()> {
        self.state.remove_filter(index);
        self.refresh()
    }

    /// Page-number click
    pub fn go_to_page(&mut self, n: u32) -> CoreResult<()> {
        self.state.set_page(n);
        self.refresh()
    }

    /// Page-size selection
    pub fn set_rows_per_page(&mut self, n: u32) -> CoreResult<()> {
        self.state.set_rows_per_page(n);
        self.refresh()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use finview_client::{ApiError, ApiResult, Transaction, TransactionSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory source recording every parameter bag it was asked for
    struct StubSource {
        total: u64,
        fail: bool,
        calls: AtomicUsize,
        seen_params: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl StubSource {
        fn new(total: u64) -> Self {
            Self {
                total,
                fail: false,
                calls: AtomicUsize::new(0),
                seen_params: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(0)
            }
        }

        fn transaction(id: i64) -> Transaction {
            serde_json::from_value(serde_json::json!({
                "id": id,
                "date": "2024-06-15T10:30:00Z",
                "amount": "10.00",
                "currency": 1,
                "account": 1,
                "description": "stub",
                "category": 1,
                "transaction_type": "expense"
            }))
            .unwrap()
        }
    }

    impl TransactionSource for StubSource {
        fn fetch_transactions(
            &self,
            params: &[(String, String)],
        ) -> ApiResult<TransactionPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_params.lock().unwrap().push(params.to_vec());
            if self.fail {
                return Err(ApiError::Status { status: 500 });
            }
            Ok(TransactionPage {
                count: self.total,
                next: None,
                previous: None,
                results: vec![Self::transaction(1)],
            })
        }
    }

    fn param(params: &[(String, String)], key: &str) -> Option<String> {
        params.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_refresh_replaces_result_and_total() {
        let source = Arc::new(StubSource::new(42));
        let mut controller = ListController::new(source.clone());
        assert!(controller.result().is_none());

        controller.refresh().unwrap();
        let page = controller.result().unwrap();
        assert_eq!(page.count, 42);
        assert_eq!(page.results.len(), 1);
        assert_eq!(controller.state().page.total_count, 42);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_page() {
        let ok = Arc::new(StubSource::new(10));
        let mut controller = ListController::new(ok);
        controller.refresh().unwrap();

        let failing = Arc::new(StubSource::failing());
        controller.source = failing;
        let result = controller.refresh();
        assert!(matches!(result, Err(CoreError::Fetch(_))));
        assert_eq!(controller.result().unwrap().count, 10);
    }

    #[test]
    fn test_one_fetch_per_event() {
        let source = Arc::new(StubSource::new(100));
        let mut controller = ListController::new(source.clone());

        controller.sort_by("amount").unwrap();
        controller.add_filter().unwrap();
        controller.go_to_page(2).unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_rejected_mutation_skips_fetch() {
        let source = Arc::new(StubSource::new(100));
        let mut controller = ListController::new(source.clone());
        controller.add_filter().unwrap();
        controller.set_filter_field(0, "datetime_from").unwrap();
        let calls_before = source.calls.load(Ordering::SeqCst);

        let result = controller.set_filter_value(0, "garbage");
        assert!(matches!(result, Err(CoreError::InvalidDateValue { .. })));
        assert_eq!(source.calls.load(Ordering::SeqCst), calls_before);
    }

    #[test]
    fn test_event_handlers_emit_translated_params() {
        let source = Arc::new(StubSource::new(1000));
        let mut controller = ListController::new(source.clone());
        controller.set_rows_per_page(30).unwrap();
        controller.go_to_page(4).unwrap();

        let seen = source.seen_params.lock().unwrap();
        let last = seen.last().unwrap();
        assert_eq!(param(last, "offset").as_deref(), Some("90"));
        assert_eq!(param(last, "limit").as_deref(), Some("30"));
        assert_eq!(param(last, "ordering").as_deref(), Some("-date"));
    }

    #[test]
    fn test_window_and_nav_follow_fetched_total() {
        let source = Arc::new(StubSource::new(300));
        let mut controller = ListController::new(source);
        controller.refresh().unwrap();

        // 300 records at 15 rows per page is 20 pages
        assert_eq!(controller.state().page.total_pages(), 20);
        let window = controller.window();
        assert_eq!(window.first(), Some(&PageItem::Number(1)));
        assert_eq!(window.last(), Some(&PageItem::Number(20)));

        let nav = controller.nav();
        assert!(!nav.previous);
        assert!(nav.next);
    }
}
