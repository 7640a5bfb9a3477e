//! Complaints hook.

use serde_json::json;

use crate::api::endpoints;
use crate::cache::{Mutation, Resource};
use crate::errors::{PortalError, PortalResult};
use crate::filters::ComplaintFilters;
use crate::models::{
    Complaint, ComplaintAssignment, ComplaintStatus, ComplaintStatusUpdate, NewComplaint,
};
use crate::portal::Portal;

pub struct ComplaintsHook<'a> {
    portal: &'a Portal,
}

impl<'a> ComplaintsHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    /// Staff see the admin list; citizens see the public one.
    pub async fn list(&self, filters: &ComplaintFilters) -> PortalResult<Vec<Complaint>> {
        let ctx = self.portal.request_context();
        let resource = if ctx.is_authenticated() {
            Resource::Complaints
        } else {
            Resource::PublicComplaints
        };
        self.portal
            .read_list(ctx, resource, &endpoints::complaints(), filters)
            .await
    }

    pub async fn get(&self, id: &str) -> PortalResult<Complaint> {
        let ctx = self.portal.request_context();
        self.portal
            .read_item(ctx, Resource::Complaint, &endpoints::complaint(id), id)
            .await
    }

    /// Public lookup by the tracking number handed out on submission.
    pub async fn track(&self, tracking_number: &str) -> PortalResult<Complaint> {
        let tracking_number = tracking_number.trim();
        if tracking_number.is_empty() {
            return Err(PortalError::Validation(
                "Tracking number is required".to_string(),
            ));
        }
        let ctx = self.portal.request_context();
        self.portal
            .read_item(
                ctx,
                Resource::Complaint,
                &endpoints::track_complaint(tracking_number),
                tracking_number,
            )
            .await
    }

    /// Submit from the public form; works with or without a session.
    pub async fn submit(&self, complaint: &NewComplaint) -> PortalResult<Complaint> {
        complaint.validate()?;
        let ctx = self.portal.request_context();
        self.portal
            .run_mutation(
                Mutation::SubmitComplaint,
                self.portal
                    .client()
                    .post(endpoints::SUBMIT_COMPLAINT, &ctx, complaint),
            )
            .await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
        note: Option<String>,
    ) -> PortalResult<Complaint> {
        let ctx = self.portal.editor_context(Mutation::UpdateComplaintStatus)?;
        let body = ComplaintStatusUpdate {
            status,
            resolution_note: note,
        };
        self.portal
            .run_mutation(
                Mutation::UpdateComplaintStatus,
                self.portal
                    .client()
                    .put(&endpoints::complaint_status(id), &ctx, &body),
            )
            .await
    }

    pub async fn resolve(&self, id: &str, note: &str) -> PortalResult<Complaint> {
        let ctx = self.portal.editor_context(Mutation::ResolveComplaint)?;
        if note.trim().is_empty() {
            return Err(PortalError::Validation(
                "A resolution note is required".to_string(),
            ));
        }
        self.portal
            .run_mutation(
                Mutation::ResolveComplaint,
                self.portal.client().put(
                    &endpoints::resolve_complaint(id),
                    &ctx,
                    &json!({ "resolutionNote": note.trim() }),
                ),
            )
            .await
    }

    pub async fn assign(&self, id: &str, employee_id: &str) -> PortalResult<Complaint> {
        let ctx = self.portal.editor_context(Mutation::AssignComplaint)?;
        let body = ComplaintAssignment {
            employee_id: employee_id.to_string(),
        };
        self.portal
            .run_mutation(
                Mutation::AssignComplaint,
                self.portal
                    .client()
                    .put(&endpoints::assign_complaint(id), &ctx, &body),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> PortalResult<()> {
        let ctx = self.portal.editor_context(Mutation::DeleteComplaint)?;
        let path = endpoints::admin_item(&endpoints::complaints(), id);
        self.portal
            .run_mutation(
                Mutation::DeleteComplaint,
                self.portal.client().delete(&path, &ctx),
            )
            .await
    }
}
