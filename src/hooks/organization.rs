//! Organization hierarchy hook.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::endpoints;
use crate::cache::{Mutation, Resource};
use crate::errors::PortalResult;
use crate::models::{Department, Division, OrgUnitInput, OrgUnitKind, Sector, Subcity};
use crate::portal::Portal;

/// Parent scope for organization lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_id: Option<String>,
}

fn resource_for(kind: OrgUnitKind) -> Resource {
    match kind {
        OrgUnitKind::Subcity => Resource::Subcities,
        OrgUnitKind::Sector => Resource::Sectors,
        OrgUnitKind::Division => Resource::Divisions,
        OrgUnitKind::Department => Resource::Departments,
    }
}

pub struct OrganizationHook<'a> {
    portal: &'a Portal,
}

impl<'a> OrganizationHook<'a> {
    pub(crate) fn new(portal: &'a Portal) -> Self {
        Self { portal }
    }

    async fn list<T>(&self, kind: OrgUnitKind, filters: &OrgFilters) -> PortalResult<Vec<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let ctx = self.portal.request_context();
        self.portal
            .read_list(ctx, resource_for(kind), &endpoints::org_units(kind), filters)
            .await
    }

    pub async fn subcities(&self) -> PortalResult<Vec<Subcity>> {
        self.list(OrgUnitKind::Subcity, &OrgFilters::default()).await
    }

    /// Sectors, optionally scoped to one subcity.
    pub async fn sectors(&self, subcity_id: Option<&str>) -> PortalResult<Vec<Sector>> {
        let filters = OrgFilters {
            subcity_id: subcity_id.map(str::to_string),
            ..Default::default()
        };
        self.list(OrgUnitKind::Sector, &filters).await
    }

    pub async fn divisions(&self, sector_id: Option<&str>) -> PortalResult<Vec<Division>> {
        let filters = OrgFilters {
            sector_id: sector_id.map(str::to_string),
            ..Default::default()
        };
        self.list(OrgUnitKind::Division, &filters).await
    }

    pub async fn departments(&self, division_id: Option<&str>) -> PortalResult<Vec<Department>> {
        let filters = OrgFilters {
            division_id: division_id.map(str::to_string),
            ..Default::default()
        };
        self.list(OrgUnitKind::Department, &filters).await
    }

    /// Create a unit when `id` is `None`, otherwise update it.
    pub async fn save<T>(
        &self,
        kind: OrgUnitKind,
        id: Option<&str>,
        input: &OrgUnitInput,
    ) -> PortalResult<T>
    where
        T: DeserializeOwned,
    {
        let mutation = Mutation::SaveOrgUnit(kind);
        let ctx = self.portal.editor_context(mutation)?;
        input.validate(kind)?;

        let client = self.portal.client();
        match id {
            Some(id) => {
                let path = endpoints::org_unit(kind, id);
                self.portal
                    .run_mutation(mutation, client.put(&path, &ctx, input))
                    .await
            }
            None => {
                let path = endpoints::org_units(kind).admin;
                self.portal
                    .run_mutation(mutation, client.post(&path, &ctx, input))
                    .await
            }
        }
    }

    pub async fn delete(&self, kind: OrgUnitKind, id: &str) -> PortalResult<()> {
        let mutation = Mutation::DeleteOrgUnit(kind);
        let ctx = self.portal.editor_context(mutation)?;
        let path = endpoints::org_unit(kind, id);
        self.portal
            .run_mutation(mutation, self.portal.client().delete(&path, &ctx))
            .await
    }
}
