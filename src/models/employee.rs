//! Employee record model.

use serde::{Deserialize, Serialize};

use super::complaint::validate_email;
use crate::errors::PortalError;

/// A staff record shown on the public directory and the admin tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    /// Staff number printed on the badge
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_active() -> bool {
    true
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Request body for creating or replacing an employee record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl EmployeeInput {
    pub fn validate(&self) -> Result<(), PortalError> {
        let required = [
            ("Employee ID", &self.employee_id),
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Position", &self.position),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(PortalError::Validation(format!("{} is required", label)));
            }
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}
