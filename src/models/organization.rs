//! Organizational hierarchy: subcities, sectors, divisions and departments.

use serde::{Deserialize, Serialize};

use crate::errors::PortalError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subcity {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_am: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_am: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_am: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sector_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_am: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub division_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
}

/// The four unit kinds; selects the endpoint path and cache resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrgUnitKind {
    Subcity,
    Sector,
    Division,
    Department,
}

impl OrgUnitKind {
    /// Path segment shared by the admin and public endpoints.
    pub fn path_segment(&self) -> &'static str {
        match self {
            OrgUnitKind::Subcity => "subcities",
            OrgUnitKind::Sector => "sectors",
            OrgUnitKind::Division => "divisions",
            OrgUnitKind::Department => "departments",
        }
    }
}

/// Request body for creating or renaming any organizational unit.
///
/// `parent_id` is the sector for a division and the division for a department;
/// it is ignored for subcities and sectors.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_am: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
}

impl OrgUnitInput {
    pub fn validate(&self, kind: OrgUnitKind) -> Result<(), PortalError> {
        if self.name.trim().is_empty() {
            return Err(PortalError::Validation("Name is required".to_string()));
        }
        match kind {
            OrgUnitKind::Division if self.sector_id.is_none() => Err(PortalError::Validation(
                "A division must belong to a sector".to_string(),
            )),
            OrgUnitKind::Department if self.division_id.is_none() => Err(PortalError::Validation(
                "A department must belong to a division".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
