//! User, role and login types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role attached to a signed-in user.
///
/// The backend has issued two spellings over time (`ADMIN` and the
/// namespaced `ROLE_ADMIN`). Both are folded into one variant when the
/// value is parsed, so nothing downstream compares raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    User,
    Librarian,
    Admin,
}

impl Role {
    const NAMESPACE: &'static str = "ROLE_";

    /// Canonical role for a raw backend value. Unknown values get the least privilege.
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix(Self::NAMESPACE).unwrap_or(&upper);
        match bare {
            "ADMIN" => Role::Admin,
            "LIBRARIAN" => Role::Librarian,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Librarian => "LIBRARIAN",
            Role::Admin => "ADMIN",
        }
    }

    /// Spelling expected by the backend's user management endpoints
    pub fn authority(&self) -> String {
        format!("{}{}", Self::NAMESPACE, self.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::normalize(&s)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::normalize(s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Profile of the signed-in user, persisted next to the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_librarian(&self) -> bool {
        self.role == Role::Librarian
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Credentials submitted to `POST /auth/login`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.to_string(),
        }
    }
}

/// Body of a login answer. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    pub token: Option<String>,
    pub username: Option<String>,
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub id: Option<i64>,
    pub message: Option<String>,
}

impl LoginResponse {
    /// Profile derived from the answer; `fallback_username` is the name that was submitted.
    pub fn profile(&self, fallback_username: &str) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self
                .username
                .clone()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| fallback_username.to_string()),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role.as_deref().map(Role::normalize).unwrap_or_default(),
        }
    }
}

/// Staff account as listed on the user management screen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: Option<NaiveDateTime>,
    pub last_login: Option<NaiveDateTime>,
    #[serde(default)]
    pub system_generated: bool,
}

fn default_true() -> bool {
    true
}

/// Create/update user form
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(serialize_with = "serialize_authority")]
    pub role: Role,
}

/// Request to let the backend pick a username and password
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUserForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(serialize_with = "serialize_authority")]
    pub role: Role,
}

/// Credentials created by `POST /users/generate`, shown once to the admin
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Password reset body for `PUT /users/{id}/password`
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

fn serialize_authority<S>(role: &Role, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&role.authority())
}
