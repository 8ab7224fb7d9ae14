//! Dashboard statistics service

use crate::{
    error::AppResult,
    http::ApiClient,
    models::{ApiEnvelope, DashboardStats},
};

#[derive(Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let envelope: ApiEnvelope<DashboardStats> = self.api.get("/dashboard/stats").await?;
        envelope.into_data("Dashboard statistics")
    }
}
