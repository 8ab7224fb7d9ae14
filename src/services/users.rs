//! Staff account management (admin only)

use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppResult,
    http::ApiClient,
    models::{
        user::{GenerateUserForm, GeneratedUser, ResetPassword, UserForm},
        ApiEnvelope, UserAccount,
    },
};

#[derive(Clone)]
pub struct UsersService {
    api: ApiClient,
}

impl UsersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> AppResult<Vec<UserAccount>> {
        let envelope: ApiEnvelope<Vec<UserAccount>> = self.api.get("/users").await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, id: i64) -> AppResult<UserAccount> {
        let envelope: ApiEnvelope<UserAccount> = self.api.get(&format!("/users/{}", id)).await?;
        envelope.into_data("User")
    }

    pub async fn create(&self, form: &UserForm) -> AppResult<UserAccount> {
        form.validate()?;
        let envelope: ApiEnvelope<UserAccount> = self.api.post("/users", form).await?;
        let user = envelope.into_data("User")?;
        tracing::info!("Created user {} with role {}", user.username, user.role);
        Ok(user)
    }

    /// Let the backend pick the credentials; the password is only returned here
    pub async fn generate(&self, form: &GenerateUserForm) -> AppResult<GeneratedUser> {
        form.validate()?;
        let envelope: ApiEnvelope<GeneratedUser> = self.api.post("/users/generate", form).await?;
        let user = envelope.into_data("Generated user")?;
        tracing::info!("Generated user {} with role {}", user.username, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: i64, form: &UserForm) -> AppResult<UserAccount> {
        form.validate()?;
        let envelope: ApiEnvelope<UserAccount> =
            self.api.put(&format!("/users/{}", id), form).await?;
        envelope.into_data("User")
    }

    pub async fn reset_password(&self, id: i64, new_password: &str) -> AppResult<()> {
        let body = ResetPassword {
            new_password: new_password.trim().to_string(),
        };
        body.validate()?;
        let _: ApiEnvelope<Value> = self.api.put(&format!("/users/{}/password", id), &body).await?;
        tracing::info!("Password reset for user {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let _: ApiEnvelope<Value> = self.api.delete(&format!("/users/{}", id)).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn activate(&self, id: i64) -> AppResult<UserAccount> {
        let envelope: ApiEnvelope<UserAccount> =
            self.api.patch_empty(&format!("/users/{}/activate", id)).await?;
        envelope.into_data("User")
    }

    pub async fn deactivate(&self, id: i64) -> AppResult<UserAccount> {
        let envelope: ApiEnvelope<UserAccount> =
            self.api.patch_empty(&format!("/users/{}/deactivate", id)).await?;
        envelope.into_data("User")
    }
}
