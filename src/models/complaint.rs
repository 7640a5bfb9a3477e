//! Complaint model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_timestamp;
use crate::errors::PortalError;

/// Complaint lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Submitted,
    UnderReview,
    Investigating,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "submitted",
            ComplaintStatus::UnderReview => "under_review",
            ComplaintStatus::Investigating => "investigating",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Closed => "closed",
        }
    }

    /// Parse a wire value. Matching is exact; `"Resolved"` is not a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "submitted" => Some(ComplaintStatus::Submitted),
            "under_review" => Some(ComplaintStatus::UnderReview),
            "investigating" => Some(ComplaintStatus::Investigating),
            "resolved" => Some(ComplaintStatus::Resolved),
            "closed" => Some(ComplaintStatus::Closed),
            _ => None,
        }
    }
}

/// Complaint urgency.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl ComplaintPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintPriority::Low => "low",
            ComplaintPriority::Normal => "normal",
            ComplaintPriority::High => "high",
            ComplaintPriority::Urgent => "urgent",
        }
    }
}

/// A citizen complaint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub tracking_number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub priority: ComplaintPriority,
    pub complainant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complainant_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complainant_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    /// Kept as the raw backend string; parsed lazily by the date filters
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Complaint {
    /// Parse `created_at`, if possible.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

/// Request body for submitting a new complaint from the public form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub complainant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complainant_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complainant_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default)]
    pub priority: ComplaintPriority,
}

/// Request body for an admin status change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStatusUpdate {
    pub status: ComplaintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
}

/// Request body for assigning a complaint to an employee.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintAssignment {
    pub employee_id: String,
}

impl NewComplaint {
    /// Form-level checks run before the request leaves the client.
    pub fn validate(&self) -> Result<(), PortalError> {
        if self.title.trim().is_empty() {
            return Err(PortalError::Validation("Title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(PortalError::Validation("Description is required".to_string()));
        }
        if self.complainant_name.trim().is_empty() {
            return Err(PortalError::Validation(
                "Complainant name is required".to_string(),
            ));
        }
        if let Some(email) = &self.complainant_email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Minimal shape check for e-mail fields; the backend does the real validation.
pub(crate) fn validate_email(email: &str) -> Result<(), PortalError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(PortalError::Validation(format!("Invalid email address: {}", email)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        let parsed: ComplaintStatus = serde_json::from_str("\"under_review\"").unwrap();
        assert_eq!(parsed, ComplaintStatus::UnderReview);
        assert_eq!(ComplaintStatus::parse("resolved"), Some(ComplaintStatus::Resolved));
        assert_eq!(ComplaintStatus::parse("Resolved"), None);
    }

    #[test]
    fn test_priority_orders_by_urgency() {
        assert!(ComplaintPriority::Urgent > ComplaintPriority::High);
        assert!(ComplaintPriority::Low < ComplaintPriority::Normal);
        assert_eq!(ComplaintPriority::default(), ComplaintPriority::Normal);
    }

    #[test]
    fn test_new_complaint_validation() {
        let mut complaint = NewComplaint {
            title: "Broken streetlight".into(),
            description: "Dark since Monday".into(),
            complainant_name: "Abebe".into(),
            ..Default::default()
        };
        assert!(complaint.validate().is_ok());

        complaint.complainant_email = Some("not-an-email".into());
        assert!(matches!(complaint.validate(), Err(PortalError::Validation(_))));

        complaint.complainant_email = Some("abebe@example.gov.et".into());
        complaint.title = "   ".into();
        assert!(matches!(complaint.validate(), Err(PortalError::Validation(_))));
    }
}
