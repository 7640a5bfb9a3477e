//! Feedback hook.

use crate::api::endpoints;
use crate::cache::{Mutation, Resource};
use crate::errors::{PortalError, PortalResult};
use crate::filters::FeedbackFilters;
use crate::models::{Feedback, FeedbackResponse, NewFeedback};
use crate::portal::Portal;

pub struct FeedbackHook<'a> {
    portal: &'a Portal,
}

impl<'a> FeedbackHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    /// Staff inbox; there is no public listing.
    pub async fn list(&self, filters: &FeedbackFilters) -> PortalResult<Vec<Feedback>> {
        let ctx = self.portal.request_context();
        self.portal
            .read_list(ctx, Resource::Feedback, &endpoints::feedback(), filters)
            .await
    }

    pub async fn submit(&self, feedback: &NewFeedback) -> PortalResult<Feedback> {
        feedback.validate()?;
        let ctx = self.portal.request_context();
        self.portal
            .run_mutation(
                Mutation::SubmitFeedback,
                self.portal
                    .client()
                    .post(endpoints::SUBMIT_FEEDBACK, &ctx, feedback),
            )
            .await
    }

    pub async fn respond(&self, id: &str, response: &str) -> PortalResult<Feedback> {
        let ctx = self.portal.editor_context(Mutation::RespondFeedback)?;
        if response.trim().is_empty() {
            return Err(PortalError::Validation("Response is required".to_string()));
        }
        let body = FeedbackResponse {
            response: response.trim().to_string(),
        };
        self.portal
            .run_mutation(
                Mutation::RespondFeedback,
                self.portal
                    .client()
                    .put(&endpoints::respond_feedback(id), &ctx, &body),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> PortalResult<()> {
        let ctx = self.portal.editor_context(Mutation::DeleteFeedback)?;
        let path = endpoints::admin_item(&endpoints::feedback(), id);
        self.portal
            .run_mutation(
                Mutation::DeleteFeedback,
                self.portal.client().delete(&path, &ctx),
            )
            .await
    }
}
