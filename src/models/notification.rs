//! Staff notification model.

use serde::{Deserialize, Serialize};

/// What triggered a notification; selects the default message template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ComplaintReceived,
    ComplaintStatusChanged,
    ComplaintResolved,
    FeedbackReceived,
    FeedbackResponded,
    RatingReceived,
    #[serde(other)]
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Payload of the unread-count endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCount {
    pub count: u64,
}
