//! Citizen feedback model.

use serde::{Deserialize, Serialize};

use super::complaint::validate_email;
use crate::errors::PortalError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Responded,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::Reviewed => "reviewed",
            FeedbackStatus::Responded => "responded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: FeedbackStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Request body for the public feedback form.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
}

impl NewFeedback {
    pub fn validate(&self) -> Result<(), PortalError> {
        if self.name.trim().is_empty() {
            return Err(PortalError::Validation("Name is required".to_string()));
        }
        if self.subject.trim().is_empty() {
            return Err(PortalError::Validation("Subject is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(PortalError::Validation("Message is required".to_string()));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Request body for an admin reply.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub response: String,
}
