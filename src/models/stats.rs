//! Dashboard statistics

use rust_decimal::Decimal;
use serde::Deserialize;

/// Counters shown on the dashboard. Missing counters read as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_books: i64,
    pub available_books: i64,
    pub borrowed_books: i64,
    pub total_members: i64,
    pub total_users: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub total_fines: Decimal,
}
