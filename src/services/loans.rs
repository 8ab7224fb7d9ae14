//! Loan management service

use chrono::NaiveDate;
use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppResult,
    http::ApiClient,
    models::{loan::RenewLoan, ApiEnvelope, Loan, LoanFilter, LoanForm, LoanStats},
};

#[derive(Clone)]
pub struct LoansService {
    api: ApiClient,
}

impl LoansService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filter: LoanFilter) -> AppResult<Vec<Loan>> {
        let envelope: ApiEnvelope<Vec<Loan>> =
            self.api.get_with_query("/loans", filter.query()).await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, id: i64) -> AppResult<Loan> {
        let envelope: ApiEnvelope<Loan> = self.api.get(&format!("/loans/{}", id)).await?;
        envelope.into_data("Loan")
    }

    /// Lend a book to a member
    pub async fn create(&self, form: &LoanForm) -> AppResult<Loan> {
        form.validate()?;
        let envelope: ApiEnvelope<Loan> = self.api.post("/loans", form).await?;
        let loan = envelope.into_data("Loan")?;
        tracing::info!(
            "Loan {} created for book {} / member {}, due {}",
            loan.id,
            form.book_id,
            form.member_id,
            loan.due_date
        );
        Ok(loan)
    }

    /// Return a borrowed book
    pub async fn return_loan(&self, id: i64) -> AppResult<Loan> {
        let envelope: ApiEnvelope<Loan> =
            self.api.post_empty(&format!("/loans/{}/return", id)).await?;
        let loan = envelope.into_data("Loan")?;
        tracing::info!("Loan {} returned", id);
        Ok(loan)
    }

    /// Extend a loan; without a date the backend applies its default period
    pub async fn renew(&self, id: i64, due_date: Option<NaiveDate>) -> AppResult<Loan> {
        let body = RenewLoan { due_date };
        let envelope: ApiEnvelope<Loan> =
            self.api.post(&format!("/loans/{}/renew", id), &body).await?;
        let loan = envelope.into_data("Loan")?;
        tracing::info!("Loan {} renewed until {}", id, loan.due_date);
        Ok(loan)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let _: ApiEnvelope<Value> = self.api.delete(&format!("/loans/{}", id)).await?;
        Ok(())
    }

    pub async fn by_member(&self, member_id: i64, active_only: bool) -> AppResult<Vec<Loan>> {
        let query = if active_only {
            vec![("active".to_string(), "true".to_string())]
        } else {
            Vec::new()
        };
        let envelope: ApiEnvelope<Vec<Loan>> = self
            .api
            .get_with_query(&format!("/loans/member/{}", member_id), query)
            .await?;
        Ok(envelope.into_list())
    }

    pub async fn overdue(&self) -> AppResult<Vec<Loan>> {
        let envelope: ApiEnvelope<Vec<Loan>> = self.api.get("/loans/overdue").await?;
        Ok(envelope.into_list())
    }

    pub async fn stats(&self) -> AppResult<LoanStats> {
        let envelope: ApiEnvelope<LoanStats> = self.api.get("/loans/stats").await?;
        envelope.into_data("Loan statistics")
    }
}
