//! Ratings hook.

use crate::api::endpoints;
use crate::cache::{Mutation, Resource};
use crate::errors::PortalResult;
use crate::filters::RatingFilters;
use crate::models::{NewRating, Rating, RatingSummary};
use crate::portal::Portal;

pub struct RatingsHook<'a> {
    portal: &'a Portal,
}

impl<'a> RatingsHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    pub async fn list(&self, filters: &RatingFilters) -> PortalResult<Vec<Rating>> {
        let ctx = self.portal.request_context();
        self.portal
            .read_list(ctx, Resource::Ratings, &endpoints::ratings(), filters)
            .await
    }

    pub async fn for_employee(&self, employee_id: &str) -> PortalResult<Vec<Rating>> {
        let ctx = self.portal.request_context();
        self.portal
            .read_item(
                ctx,
                Resource::EmployeeRatings,
                &endpoints::employee_ratings(employee_id),
                employee_id,
            )
            .await
    }

    /// Averages shown on an employee's rating card.
    pub async fn summary_for_employee(&self, employee_id: &str) -> PortalResult<RatingSummary> {
        let ratings = self.for_employee(employee_id).await?;
        Ok(RatingSummary::from_ratings(&ratings))
    }

    pub async fn submit(&self, rating: &NewRating) -> PortalResult<Rating> {
        rating.validate()?;
        let ctx = self.portal.request_context();
        self.portal
            .run_mutation(
                Mutation::SubmitRating,
                self.portal
                    .client()
                    .post(endpoints::SUBMIT_RATING, &ctx, rating),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> PortalResult<()> {
        let ctx = self.portal.editor_context(Mutation::DeleteRating)?;
        let path = endpoints::admin_item(&endpoints::ratings(), id);
        self.portal
            .run_mutation(
                Mutation::DeleteRating,
                self.portal.client().delete(&path, &ctx),
            )
            .await
    }
}
