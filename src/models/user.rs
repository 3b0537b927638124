//! Admin users.

use serde::{Deserialize, Serialize};

use super::{next_numeric_id, require, status_enum, Record, StatusRecord};
use crate::errors::AppError;
use crate::store::Table;

/// Role given to the account that provisions a repository.
pub const ADMIN_ROLE: &str = "admin";

status_enum! {
    UserStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

/// A dashboard user. `supervisor` holds a name, not an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub status: UserStatus,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation(format!(
            "{:?} is not a valid email address",
            email
        ))),
    }
}

impl User {
    /// Seed administrator written into a freshly provisioned repository.
    pub fn administrator(name: &str, email: &str) -> Self {
        Self {
            id: 1,
            name: name.to_string(),
            email: email.to_string(),
            role: ADMIN_ROLE.to_string(),
            supervisor: String::new(),
            status: UserStatus::Active,
        }
    }

    pub fn from_request(id: u64, request: CreateUserRequest) -> Self {
        Self {
            id,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            role: request.role.trim().to_lowercase(),
            supervisor: request.supervisor.unwrap_or_default().trim().to_string(),
            status: request.status.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, request: &UpdateUserRequest) -> Result<(), AppError> {
        if let Some(name) = &request.name {
            require("Name", name)?;
            self.name = name.trim().to_string();
        }
        if let Some(email) = &request.email {
            validate_email(email)?;
            self.email = email.trim().to_lowercase();
        }
        if let Some(role) = &request.role {
            require("Role", role)?;
            self.role = role.trim().to_lowercase();
        }
        if let Some(supervisor) = &request.supervisor {
            self.supervisor = supervisor.trim().to_string();
        }
        if let Some(status) = request.status {
            self.status = status;
        }
        Ok(())
    }
}

impl Record for User {
    type Id = u64;
    const TABLE: Table = Table::Users;

    fn id(&self) -> &u64 {
        &self.id
    }

    fn next_id(existing: &[Self]) -> Result<u64, AppError> {
        next_numeric_id(Self::TABLE, existing.iter().map(|u| &u.id))
    }
}

impl StatusRecord for User {
    type Status = UserStatus;

    fn status(&self) -> UserStatus {
        self.status
    }
}

/// Request body for inviting a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("Name", &self.name)?;
        require("Role", &self.role)?;
        validate_email(&self.email)
    }
}

/// Request body for updating a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub expected_sha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("dispatch@fleet.example").is_ok());
        assert!(validate_email("dispatch").is_err());
        assert!(validate_email("@fleet.example").is_err());
        assert!(validate_email("dispatch@localhost").is_err());
    }
}
