//! Library members service

use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppResult,
    http::{encoded_path, ApiClient},
    models::{ApiEnvelope, Member, MemberForm},
};

#[derive(Clone)]
pub struct MembersService {
    api: ApiClient,
}

impl MembersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Member>> {
        let query = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| vec![("search".to_string(), s.to_string())])
            .unwrap_or_default();
        let envelope: ApiEnvelope<Vec<Member>> = self.api.get_with_query("/members", query).await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, id: i64) -> AppResult<Member> {
        let envelope: ApiEnvelope<Member> = self.api.get(&format!("/members/{}", id)).await?;
        envelope.into_data("Member")
    }

    pub async fn create(&self, form: &MemberForm) -> AppResult<Member> {
        form.validate()?;
        let envelope: ApiEnvelope<Member> = self.api.post("/members", form).await?;
        let member = envelope.into_data("Member")?;
        tracing::info!("Registered member {} ({})", member.id, member.full_name());
        Ok(member)
    }

    pub async fn update(&self, id: i64, form: &MemberForm) -> AppResult<Member> {
        form.validate()?;
        let envelope: ApiEnvelope<Member> =
            self.api.put(&format!("/members/{}", id), form).await?;
        envelope.into_data("Member")
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let _: ApiEnvelope<Value> = self.api.delete(&format!("/members/{}", id)).await?;
        tracing::info!("Deleted member {}", id);
        Ok(())
    }

    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Member>> {
        let query = vec![("keyword".to_string(), keyword.trim().to_string())];
        let envelope: ApiEnvelope<Vec<Member>> =
            self.api.get_with_query("/members/search", query).await?;
        Ok(envelope.into_list())
    }

    pub async fn by_email(&self, email: &str) -> AppResult<Member> {
        let path = encoded_path("/members/email", &[email.trim()])?;
        let envelope: ApiEnvelope<Member> = self.api.get(&path).await?;
        envelope.into_data("Member")
    }

    pub async fn by_membership_id(&self, membership_id: &str) -> AppResult<Member> {
        let path = encoded_path("/members/membership", &[membership_id.trim()])?;
        let envelope: ApiEnvelope<Member> = self.api.get(&path).await?;
        envelope.into_data("Member")
    }

    pub async fn count(&self) -> AppResult<i64> {
        let envelope: ApiEnvelope<i64> = self.api.get("/members/count").await?;
        envelope.into_data("Member count")
    }
}
