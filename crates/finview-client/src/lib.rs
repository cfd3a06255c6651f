//! HTTP client for the remote finance API
//!
//! The API follows REST conventions: token authentication via the
//! `Authorization: Token <token>` header and `limit`/`offset`
//! pagination with `{count, next, previous, results}` envelopes.
//!
//! The transaction list controller talks to this crate only through
//! the [`TransactionSource`] trait, so tests can substitute an
//! in-memory source.

pub mod error;
pub mod models;
pub mod session;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub use error::{ApiError, ApiResult};
pub use models::{
    Account, AccountPayload, AccountType, AccountTypePayload, BalancePoint, Bank, BankPayload,
    Budget, BudgetCategory, BudgetPayload, Category, CategoryPayload, Currency, CurrencyPayload,
    Paginated, RecordId, Transaction, TransactionPage, TransactionType, User,
};
pub use session::{Session, TokenResponse};

/// Paginated transaction endpoint the list controller fetches through
pub trait TransactionSource: Send + Sync {
    /// Fetch one page of the combined transaction list
    fn fetch_transactions(&self, params: &[(String, String)]) -> ApiResult<TransactionPage>;
}

/// Shared reference to a transaction source
pub type SourceRef = Arc<dyn TransactionSource>;

/// Combined income/expense transaction list endpoint
const TRANSACTIONS_PATH: &str = "/transactions/transactions/";

/// Page size used when draining reference collections
const REFERENCE_PAGE_LIMIT: u32 = 50;

/// Client for one API host, bound to an authenticated session
pub struct ApiClient {
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for `base_url` using an existing session
    pub fn new<U: Into<String>>(base_url: U, session: Session) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, session }
    }

    /// Exchange credentials for a session token
    pub fn login(base_url: &str, email: &str, password: &str) -> ApiResult<Session> {
        let base = base_url.trim_end_matches('/');
        let url = format!("{}/auth/token/login/", base);
        log::debug!("POST {}", url);
        let response: TokenResponse = ureq::post(&url)
            .send_json(serde_json::json!({
                "email": email,
                "password": password,
            }))?
            .body_mut()
            .read_json()?;
        Ok(response.into())
    }

    /// Invalidate the session token on the server
    pub fn logout(&self) -> ApiResult<()> {
        let url = self.url("/auth/token/logout/");
        log::debug!("POST {}", url);
        ureq::post(&url)
            .header("Authorization", &self.session.authorization())
            .send_empty()?;
        Ok(())
    }

    /// The authenticated user's profile
    pub fn current_user(&self) -> ApiResult<User> {
        self.get_json(&self.url("/users/me/"))
    }

    // ==================== Transactions ====================

    /// One page of the combined transaction list
    ///
    /// `params` is the flat parameter bag produced by the query
    /// translator: `offset`, `limit`, `ordering` and one entry per
    /// active filter.
    pub fn transactions(&self, params: &[(String, String)]) -> ApiResult<TransactionPage> {
        let mut url = self.url(TRANSACTIONS_PATH);
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url = format!("{}?{}", url, query.join("&"));
        }
        self.get_json(&url)
    }

    // ==================== Reference Collections ====================

    /// All currencies
    pub fn currencies(&self) -> ApiResult<Vec<Currency>> {
        self.list_page("/currencies/")
    }

    /// All account types
    pub fn account_types(&self) -> ApiResult<Vec<AccountType>> {
        self.list_page("/accountTypes/")
    }

    /// All banks
    pub fn banks(&self) -> ApiResult<Vec<Bank>> {
        self.list_page("/banks/")
    }

    /// All income categories
    pub fn income_categories(&self) -> ApiResult<Vec<Category>> {
        self.list_page("/incomeCategories/")
    }

    /// All expense categories
    pub fn expense_categories(&self) -> ApiResult<Vec<Category>> {
        self.list_page("/expenseCategories/")
    }

    /// Income and expense categories merged, in that order
    pub fn categories(&self) -> ApiResult<Vec<Category>> {
        let mut categories = self.income_categories()?;
        categories.extend(self.expense_categories()?);
        Ok(categories)
    }

    /// All accounts, drained across pages
    pub fn accounts(&self) -> ApiResult<Vec<Account>> {
        let first = format!("{}?limit={}", self.url("/accounts/"), REFERENCE_PAGE_LIMIT);
        self.fetch_all_paginated(first)
    }

    /// All budgets with computed spending totals
    pub fn budgets(&self) -> ApiResult<Vec<Budget>> {
        let page: Paginated<Budget> = self.get_json(&self.url("/budgets/"))?;
        Ok(page.results)
    }

    /// Balance history of one account over a date range, drained across pages
    pub fn balance_history(
        &self,
        account: RecordId,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<Vec<BalancePoint>> {
        let first = format!(
            "{}?limit={}&start_date={}&end_date={}",
            self.url(&format!("/accounts/{}/balance-history/", account)),
            REFERENCE_PAGE_LIMIT,
            urlencoding::encode(start_date),
            urlencoding::encode(end_date),
        );
        self.fetch_all_paginated(first)
    }

    // ==================== Currency CRUD ====================

    /// Create a currency
    pub fn add_currency(&self, payload: &CurrencyPayload) -> ApiResult<Currency> {
        self.post_json(&self.url("/currencies/"), payload)
    }

    /// Update a currency
    pub fn update_currency(&self, id: RecordId, payload: &CurrencyPayload) -> ApiResult<Currency> {
        self.put_json(&self.url(&format!("/currencies/{}/", id)), payload)
    }

    /// Delete a currency
    pub fn delete_currency(&self, id: RecordId) -> ApiResult<()> {
        self.delete(&self.url(&format!("/currencies/{}/", id)))
    }

    // ==================== Account Type CRUD ====================

    /// Create an account type
    pub fn add_account_type(&self, payload: &AccountTypePayload) -> ApiResult<AccountType> {
        self.post_json(&self.url("/accountTypes/"), payload)
    }

    /// Update an account type
    pub fn update_account_type(
        &self,
        id: RecordId,
        payload: &AccountTypePayload,
    ) -> ApiResult<AccountType> {
        self.put_json(&self.url(&format!("/accountTypes/{}/", id)), payload)
    }

    /// Delete an account type
    pub fn delete_account_type(&self, id: RecordId) -> ApiResult<()> {
        self.delete(&self.url(&format!("/accountTypes/{}/", id)))
    }

    // ==================== Bank CRUD ====================

    /// Create a bank
    pub fn add_bank(&self, payload: &BankPayload) -> ApiResult<Bank> {
        self.post_json(&self.url("/banks/"), payload)
    }

    /// Update a bank
    pub fn update_bank(&self, id: RecordId, payload: &BankPayload) -> ApiResult<Bank> {
        self.put_json(&self.url(&format!("/banks/{}/", id)), payload)
    }

    /// Delete a bank
    pub fn delete_bank(&self, id: RecordId) -> ApiResult<()> {
        self.delete(&self.url(&format!("/banks/{}/", id)))
    }

    // ==================== Account CRUD ====================

    /// Create an account
    pub fn add_account(&self, payload: &AccountPayload) -> ApiResult<Account> {
        self.post_json(&self.url("/accounts/"), payload)
    }

    /// Update an account
    pub fn update_account(&self, id: RecordId, payload: &AccountPayload) -> ApiResult<Account> {
        self.put_json(&self.url(&format!("/accounts/{}/", id)), payload)
    }

    /// Delete an account
    pub fn delete_account(&self, id: RecordId) -> ApiResult<()> {
        self.delete(&self.url(&format!("/accounts/{}/", id)))
    }

    // ==================== Category CRUD ====================

    /// Create a category of the given kind
    pub fn add_category(
        &self,
        kind: TransactionType,
        payload: &CategoryPayload,
    ) -> ApiResult<Category> {
        self.post_json(&self.url(category_path(kind)), payload)
    }

    /// Update a category of the given kind
    pub fn update_category(
        &self,
        kind: TransactionType,
        id: RecordId,
        payload: &CategoryPayload,
    ) -> ApiResult<Category> {
        self.put_json(&self.url(&format!("{}{}/", category_path(kind), id)), payload)
    }

    /// Delete a category of the given kind
    pub fn delete_category(&self, kind: TransactionType, id: RecordId) -> ApiResult<()> {
        self.delete(&self.url(&format!("{}{}/", category_path(kind), id)))
    }

    // ==================== Budget CRUD ====================

    /// Create a budget
    pub fn add_budget(&self, payload: &BudgetPayload) -> ApiResult<Budget> {
        self.post_json(&self.url("/budgets/"), payload)
    }

    /// Update a budget
    pub fn update_budget(&self, id: RecordId, payload: &BudgetPayload) -> ApiResult<Budget> {
        self.put_json(&self.url(&format!("/budgets/{}/", id)), payload)
    }

    /// Delete a budget
    pub fn delete_budget(&self, id: RecordId) -> ApiResult<()> {
        self.delete(&self.url(&format!("/budgets/{}/", id)))
    }

    // ==================== Request Helpers ====================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// First page of a reference collection
    fn list_page<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let url = format!("{}?limit={}", self.url(path), REFERENCE_PAGE_LIMIT);
        let page: Paginated<T> = self.get_json(&url)?;
        Ok(page.results)
    }

    /// Drain a paginated collection by following `next` links
    fn fetch_all_paginated<T: DeserializeOwned>(&self, first_url: String) -> ApiResult<Vec<T>> {
        let mut results = Vec::new();
        let mut next_url = Some(first_url);
        while let Some(url) = next_url {
            let page: Paginated<T> = self.get_json(&url)?;
            results.extend(page.results);
            next_url = page.next;
        }
        Ok(results)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        log::debug!("GET {}", url);
        let mut response = ureq::get(url)
            .header("Authorization", &self.session.authorization())
            .call()?;
        Ok(response.body_mut().read_json()?)
    }

    fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> ApiResult<T> {
        log::debug!("POST {}", url);
        let mut response = ureq::post(url)
            .header("Authorization", &self.session.authorization())
            .send_json(body)?;
        Ok(response.body_mut().read_json()?)
    }

    fn put_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> ApiResult<T> {
        log::debug!("PUT {}", url);
        let mut response = ureq::put(url)
            .header("Authorization", &self.session.authorization())
            .send_json(body)?;
        Ok(response.body_mut().read_json()?)
    }

    fn delete(&self, url: &str) -> ApiResult<()> {
        log::debug!("DELETE {}", url);
        ureq::delete(url)
            .header("Authorization", &self.session.authorization())
            .call()?;
        Ok(())
    }
}

fn category_path(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "/incomeCategories/",
        TransactionType::Expense => "/expenseCategories/",
    }
}

impl TransactionSource for ApiClient {
    fn fetch_transactions(&self, params: &[(String, String)]) -> ApiResult<TransactionPage> {
        self.transactions(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = ApiClient::new("http://localhost:8000/api/v1/", Session::new("t"));
        assert_eq!(
            client.url("/currencies/"),
            "http://localhost:8000/api/v1/currencies/"
        );
    }

    #[test]
    fn test_category_path_by_kind() {
        assert_eq!(category_path(TransactionType::Income), "/incomeCategories/");
        assert_eq!(category_path(TransactionType::Expense), "/expenseCategories/");
    }
}
