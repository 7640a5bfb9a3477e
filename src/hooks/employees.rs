//! Employees hook.

use crate::api::endpoints;
use crate::cache::{Mutation, Resource};
use crate::errors::PortalResult;
use crate::filters::EmployeeFilters;
use crate::models::{Employee, EmployeeInput};
use crate::portal::Portal;

pub struct EmployeesHook<'a> {
    portal: &'a Portal,
}

impl<'a> EmployeesHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    pub async fn list(&self, filters: &EmployeeFilters) -> PortalResult<Vec<Employee>> {
        let ctx = self.portal.request_context();
        self.portal
            .read_list(ctx, Resource::Employees, &endpoints::employees(), filters)
            .await
    }

    pub async fn get(&self, id: &str) -> PortalResult<Employee> {
        let ctx = self.portal.request_context();
        self.portal
            .read_item(ctx, Resource::Employee, &endpoints::employee(id), id)
            .await
    }

    pub async fn create(&self, input: &EmployeeInput) -> PortalResult<Employee> {
        let ctx = self.portal.editor_context(Mutation::CreateEmployee)?;
        input.validate()?;
        self.portal
            .run_mutation(
                Mutation::CreateEmployee,
                self.portal
                    .client()
                    .post(&endpoints::employees().admin, &ctx, input),
            )
            .await
    }

    pub async fn update(&self, id: &str, input: &EmployeeInput) -> PortalResult<Employee> {
        let ctx = self.portal.editor_context(Mutation::UpdateEmployee)?;
        input.validate()?;
        let path = endpoints::admin_item(&endpoints::employees(), id);
        self.portal
            .run_mutation(
                Mutation::UpdateEmployee,
                self.portal.client().put(&path, &ctx, input),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> PortalResult<()> {
        let ctx = self.portal.editor_context(Mutation::DeleteEmployee)?;
        let path = endpoints::admin_item(&endpoints::employees(), id);
        self.portal
            .run_mutation(
                Mutation::DeleteEmployee,
                self.portal.client().delete(&path, &ctx),
            )
            .await
    }
}
