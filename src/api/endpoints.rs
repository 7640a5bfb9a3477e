//! Backend paths, relative to `{base}/api`.
//!
//! Most resources come in two variants: the staff endpoint under `/admin`
//! and the citizen-facing public one. Reads pick the variant from the session.

use url::form_urlencoded;

use crate::errors::PortalError;
use crate::models::OrgUnitKind;

pub const LOGIN: &str = "/auth/login";
pub const EXPORT_REPORT: &str = "/admin/export-report";

/// Admin/public pair for one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub admin: String,
    pub public: Option<String>,
}

impl Endpoint {
    fn both(admin: impl Into<String>, public: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            public: Some(public.into()),
        }
    }

    fn admin_only(admin: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            public: None,
        }
    }

    /// Path to call for the given session state.
    pub fn select(&self, authenticated: bool, operation: &str) -> Result<&str, PortalError> {
        if authenticated {
            return Ok(&self.admin);
        }
        self.public
            .as_deref()
            .ok_or_else(|| PortalError::auth_required(operation))
    }
}

/// Percent-encode a caller-supplied id so it stays one path segment.
///
/// `/`, `?` and `#` are escaped. A bare `.` or `..` has no encoding that
/// URL parsers leave alone; the client rejects those paths before sending.
pub fn segment(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub fn complaints() -> Endpoint {
    Endpoint::both("/admin/complaints", "/complaints/public")
}

pub fn complaint(id: &str) -> Endpoint {
    Endpoint::admin_only(format!("/admin/complaints/{}", segment(id)))
}

/// Public on both sides: staff use the same lookup as citizens.
pub fn track_complaint(tracking_number: &str) -> Endpoint {
    let path = format!("/complaints/track/{}", segment(tracking_number));
    Endpoint::both(path.clone(), path)
}

pub const SUBMIT_COMPLAINT: &str = "/complaints";

pub fn complaint_status(id: &str) -> String {
    format!("/admin/complaints/{}/status", segment(id))
}

pub fn resolve_complaint(id: &str) -> String {
    format!("/admin/complaints/{}/resolve", segment(id))
}

pub fn assign_complaint(id: &str) -> String {
    format!("/admin/complaints/{}/assign", segment(id))
}

pub fn employees() -> Endpoint {
    Endpoint::both("/admin/employees", "/employees")
}

pub fn employee(id: &str) -> Endpoint {
    Endpoint::both(
        format!("/admin/employees/{}", segment(id)),
        format!("/employees/{}", segment(id)),
    )
}

pub fn feedback() -> Endpoint {
    Endpoint::admin_only("/admin/feedback")
}

pub const SUBMIT_FEEDBACK: &str = "/feedback";

pub fn respond_feedback(id: &str) -> String {
    format!("/admin/feedback/{}/respond", segment(id))
}

pub fn ratings() -> Endpoint {
    Endpoint::admin_only("/admin/ratings")
}

pub fn employee_ratings(employee_id: &str) -> Endpoint {
    Endpoint::both(
        format!("/admin/ratings/employee/{}", segment(employee_id)),
        format!("/ratings/employee/{}", segment(employee_id)),
    )
}

pub const SUBMIT_RATING: &str = "/ratings";

pub fn org_units(kind: OrgUnitKind) -> Endpoint {
    Endpoint::both(
        format!("/admin/{}", kind.path_segment()),
        format!("/{}", kind.path_segment()),
    )
}

pub fn org_unit(kind: OrgUnitKind, id: &str) -> String {
    format!("/admin/{}/{}", kind.path_segment(), segment(id))
}

pub fn statistics() -> Endpoint {
    Endpoint::both("/admin/statistics", "/statistics/public")
}

pub fn notifications() -> Endpoint {
    Endpoint::admin_only("/admin/notifications")
}

pub fn unread_notifications() -> Endpoint {
    Endpoint::admin_only("/admin/notifications/unread-count")
}

pub fn notification_read(id: &str) -> String {
    format!("/admin/notifications/{}/read", segment(id))
}

pub const NOTIFICATIONS_READ_ALL: &str = "/admin/notifications/read-all";

/// Resource path with an id appended, for updates and deletes.
pub fn admin_item(collection: &Endpoint, id: &str) -> String {
    format!("{}/{}", collection.admin, segment(id))
}
