//! Loan (borrow) model and related types

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::book::Book;
use super::member::Member;

/// Loan with its book and member, as returned by the loan endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: i64,
    pub book: Option<Book>,
    pub member: Option<Member>,
    pub loan_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub actual_return_date: Option<NaiveDate>,
    #[serde(default)]
    pub returned: bool,
    pub fine_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    /// Computed by the backend
    #[serde(default, rename = "isOverdue")]
    pub overdue: bool,
    #[serde(default)]
    pub days_overdue: i64,
    pub calculated_fine: Option<Decimal>,
}

impl Loan {
    /// Overdue as of `today`, independent of the backend's own flag
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        !self.returned && self.due_date < today
    }
}

/// Create loan form
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoanForm {
    #[validate(range(min = 1, message = "A book must be selected"))]
    pub book_id: i64,
    #[validate(range(min = 1, message = "A member must be selected"))]
    pub member_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

/// Body of `POST /loans/{id}/renew`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewLoan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// List filters accepted by `GET /loans`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoanFilter {
    #[default]
    All,
    Active,
    Overdue,
}

impl LoanFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            LoanFilter::All => Vec::new(),
            LoanFilter::Active => vec![("active".to_string(), "true".to_string())],
            LoanFilter::Overdue => vec![("overdue".to_string(), "true".to_string())],
        }
    }
}

/// Answer of `GET /loans/stats`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStats {
    #[serde(default)]
    pub active_loans: i64,
    #[serde(default)]
    pub overdue_loans: i64,
    #[serde(default)]
    pub total_fines: Decimal,
}
