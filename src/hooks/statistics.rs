//! Statistics hook.

use crate::api::endpoints;
use crate::cache::Resource;
use crate::errors::PortalResult;
use crate::filters::StatisticsFilters;
use crate::models::Statistics;
use crate::portal::Portal;

pub struct StatisticsHook<'a> {
    portal: &'a Portal,
}

impl<'a> StatisticsHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    /// Dashboard counters. Without a session only the public figures are requested.
    pub async fn dashboard(&self, filters: &StatisticsFilters) -> PortalResult<Statistics> {
        let ctx = self.portal.request_context();
        self.portal
            .read_list(ctx, Resource::Statistics, &endpoints::statistics(), filters)
            .await
    }
}
