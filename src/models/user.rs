//! Staff user (the backend calls it "admin") and role model.

use serde::{Deserialize, Serialize};

/// Staff roles, in decreasing order of reach.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    SubCityAdmin,
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::SubCityAdmin => "SubCityAdmin",
            Role::Admin => "Admin",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SuperAdmin" => Some(Role::SuperAdmin),
            "SubCityAdmin" => Some(Role::SubCityAdmin),
            "Admin" => Some(Role::Admin),
            "Editor" => Some(Role::Editor),
            "Viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    /// Roles allowed to run create/update/delete mutations.
    pub fn can_edit(&self) -> bool {
        !matches!(self, Role::Viewer)
    }
}

/// Authenticated staff member as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

/// Request body for the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "user")]
    pub admin: User,
}
