//! Notification message templating.
//!
//! Templates use `{name}` placeholders. Localized template tables belong to
//! the view layer; the defaults here are the English fallbacks.

use std::collections::BTreeMap;

use crate::models::NotificationKind;

/// Substitute `{name}` placeholders from `vars`.
///
/// Unknown placeholders and unbalanced braces are copied through unchanged.
pub fn render_template(template: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['}', '{']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                let name = &after[..close];
                match vars.get(name.trim()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

impl NotificationKind {
    /// English fallback template for this kind.
    pub fn default_template(&self) -> &'static str {
        match self {
            NotificationKind::ComplaintReceived => {
                "New complaint {trackingNumber} received from {complainantName}"
            }
            NotificationKind::ComplaintStatusChanged => {
                "Complaint {trackingNumber} is now {status}"
            }
            NotificationKind::ComplaintResolved => {
                "Complaint {trackingNumber} has been resolved: {resolutionNote}"
            }
            NotificationKind::FeedbackReceived => "New feedback from {name}: {subject}",
            NotificationKind::FeedbackResponded => "Your feedback \"{subject}\" received a response",
            NotificationKind::RatingReceived => "{employeeName} received a new rating of {score}",
            NotificationKind::General => "{message}",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            NotificationKind::ComplaintReceived => "New complaint",
            NotificationKind::ComplaintStatusChanged => "Complaint updated",
            NotificationKind::ComplaintResolved => "Complaint resolved",
            NotificationKind::FeedbackReceived => "New feedback",
            NotificationKind::FeedbackResponded => "Feedback answered",
            NotificationKind::RatingReceived => "New rating",
            NotificationKind::General => "Notification",
        }
    }
}

/// Render the default message for `kind`.
pub fn render_notification(kind: NotificationKind, vars: &BTreeMap<&str, String>) -> String {
    render_template(kind.default_template(), vars)
}
