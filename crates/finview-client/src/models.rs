//! Wire models for the finance API
//!
//! Field names follow the server's JSON representation. Monetary
//! amounts arrive as decimal strings and map to `rust_decimal`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-side record identifier
pub type RecordId = i64;

// ==================== List Envelope ====================

/// Paginated list envelope returned by every collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of matching records
    pub count: u64,
    /// Absolute URL of the next page, if any
    pub next: Option<String>,
    /// Absolute URL of the previous page, if any
    pub previous: Option<String>,
    /// Records of the current page
    pub results: Vec<T>,
}

/// One page of the combined transaction list
pub type TransactionPage = Paginated<Transaction>;

// ==================== Records ====================

/// Whether a transaction is money earned or money spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// One income or expense record from the combined transaction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    /// When the transaction happened
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    /// Currency record id
    pub currency: RecordId,
    /// Account record id
    pub account: RecordId,
    pub description: Option<String>,
    /// Category record id
    pub category: RecordId,
    pub transaction_type: TransactionType,
}

/// Currency reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Account type reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountType {
    pub id: RecordId,
    pub name: String,
}

/// Bank reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub id: RecordId,
    pub name: String,
    pub country: String,
}

/// User account holding money
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    pub name: String,
    pub account_type: RecordId,
    pub bank: RecordId,
    pub currency: RecordId,
    pub balance: Decimal,
    pub owner: RecordId,
}

/// Income or expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
}

/// Per-category budget line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: RecordId,
    pub category: RecordId,
    pub amount: Decimal,
    pub spent: Decimal,
}

/// Budget with server-computed spending totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: RecordId,
    pub name: String,
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_spent: Decimal,
    #[serde(default)]
    pub budget_categories: Vec<BudgetCategory>,
}

/// The authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// One point of an account balance history series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancePoint {
    pub id: RecordId,
    pub account: RecordId,
    pub date: NaiveDate,
    pub balance: Decimal,
}

// ==================== Write Payloads ====================

/// Fields for creating or updating a currency
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyPayload {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Fields for creating or updating an account type
#[derive(Debug, Clone, Serialize)]
pub struct AccountTypePayload {
    pub name: String,
}

/// Fields for creating or updating a bank
#[derive(Debug, Clone, Serialize)]
pub struct BankPayload {
    pub name: String,
    pub country: String,
}

/// Fields for creating or updating an account
#[derive(Debug, Clone, Serialize)]
pub struct AccountPayload {
    pub name: String,
    pub account_type: RecordId,
    pub bank: RecordId,
    pub currency: RecordId,
    pub balance: Decimal,
}

/// Fields for creating or updating a category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    pub description: Option<String>,
}

/// Fields for creating or updating a budget
#[derive(Debug, Clone, Serialize)]
pub struct BudgetPayload {
    pub name: String,
    pub total_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paginated_transactions() {
        let body = r#"{
            "count": 42,
            "next": "http://localhost:8000/api/v1/transactions/transactions/?limit=15&offset=15",
            "previous": null,
            "results": [
                {
                    "id": 7,
                    "date": "2024-06-15T10:30:00Z",
                    "amount": "199.99",
                    "currency": 1,
                    "account": 3,
                    "description": "Groceries",
                    "category": 5,
                    "transaction_type": "expense"
                }
            ]
        }"#;
        let page: TransactionPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.count, 42);
        assert!(page.next.is_some());
        assert!(page.previous.is_none());
        assert_eq!(page.results.len(), 1);

        let tx = &page.results[0];
        assert_eq!(tx.id, 7);
        assert_eq!(tx.amount, Decimal::new(19999, 2));
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.description.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_parse_transaction_null_description() {
        let body = r#"{
            "id": 1,
            "date": "2024-01-01T00:00:00Z",
            "amount": "10.00",
            "currency": 1,
            "account": 1,
            "description": null,
            "category": 2,
            "transaction_type": "income"
        }"#;
        let tx: Transaction = serde_json::from_str(body).unwrap();
        assert!(tx.description.is_none());
        assert_eq!(tx.transaction_type, TransactionType::Income);
    }

    #[test]
    fn test_transaction_type_round_trip() {
        assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!("Expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::Income.to_string(), "income");
    }

    #[test]
    fn test_parse_budget() {
        let body = r#"{
            "id": 2,
            "name": "Summer",
            "total_amount": "1500.00",
            "start_date": "2024-06-01",
            "end_date": "2024-08-31",
            "total_spent": "320.50",
            "budget_categories": [
                {"id": 9, "category": 5, "amount": "500.00", "spent": "120.00"}
            ]
        }"#;
        let budget: Budget = serde_json::from_str(body).unwrap();
        assert_eq!(budget.name, "Summer");
        assert_eq!(budget.total_spent, Decimal::new(32050, 2));
        assert_eq!(budget.budget_categories.len(), 1);
    }

    #[test]
    fn test_parse_user_without_accounts() {
        let body = r#"{"id": 1, "username": "sam", "email": "sam@example.org"}"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert!(user.accounts.is_empty());
        assert!(user.locale.is_none());
    }
}
