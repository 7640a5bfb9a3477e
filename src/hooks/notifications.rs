//! Staff notifications hook.

use serde_json::json;

use crate::api::endpoints;
use crate::cache::{Mutation, Resource};
use crate::errors::PortalResult;
use crate::models::{Notification, UnreadCount};
use crate::portal::Portal;

pub struct NotificationsHook<'a> {
    portal: &'a Portal,
}

impl<'a> NotificationsHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    pub async fn list(&self) -> PortalResult<Vec<Notification>> {
        let ctx = self.portal.authorized_context("list notifications")?;
        self.portal
            .read_list(ctx, Resource::Notifications, &endpoints::notifications(), &json!({}))
            .await
    }

    pub async fn unread_count(&self) -> PortalResult<u64> {
        let ctx = self.portal.authorized_context("count notifications")?;
        let unread: UnreadCount = self
            .portal
            .read_list(
                ctx,
                Resource::UnreadNotifications,
                &endpoints::unread_notifications(),
                &json!({}),
            )
            .await?;
        Ok(unread.count)
    }

    pub async fn mark_read(&self, id: &str) -> PortalResult<()> {
        let ctx = self
            .portal
            .authorized_context(Mutation::MarkNotificationRead.label())?;
        self.portal
            .run_mutation(
                Mutation::MarkNotificationRead,
                self.portal
                    .client()
                    .put_ignoring_body(&endpoints::notification_read(id), &ctx, &json!({})),
            )
            .await
    }

    pub async fn mark_all_read(&self) -> PortalResult<()> {
        let ctx = self
            .portal
            .authorized_context(Mutation::MarkAllNotificationsRead.label())?;
        self.portal
            .run_mutation(
                Mutation::MarkAllNotificationsRead,
                self.portal
                    .client()
                    .put_ignoring_body(endpoints::NOTIFICATIONS_READ_ALL, &ctx, &json!({})),
            )
            .await
    }
}
