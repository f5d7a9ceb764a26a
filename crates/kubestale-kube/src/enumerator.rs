//! Live state enumeration
//!
//! Walks the API surface the way discovery lays it out:
//!
//! 1. `/api` → every legacy version → `/api/{version}` resources
//! 2. `/apis` → every group's preferred version → `/apis/{groupVersion}` resources
//! 3. every listable, namespaced resource kind → its object list
//!
//! Requests are issued one at a time and the first failure aborts the walk.

use kubestale_core::ResourceId;

use crate::api::ClusterApi;
use crate::discovery::{self, ApiGroupList, ApiResource, ApiResourceList, ApiVersions, ObjectList};
use crate::error::Result;

/// Deprecated group version whose kinds moved elsewhere, except ingresses
pub const EXTENSIONS_V1BETA1: &str = "extensions/v1beta1";

const LEGACY_PREFIX: &str = "/api";
const GROUPS_PREFIX: &str = "/apis";

/// Lists every namespaced object of the cluster
pub struct LiveStateEnumerator<'a, A: ClusterApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ClusterApi + ?Sized> LiveStateEnumerator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Identities of all live namespaced objects, in no particular order
    pub async fn enumerate(&self) -> Result<Vec<ResourceId>> {
        let mut live = Vec::new();

        let legacy: ApiVersions = self.fetch(LEGACY_PREFIX).await?;
        for version in &legacy.versions {
            self.collect_group_version(LEGACY_PREFIX, version, &mut live)
                .await?;
        }

        let groups: ApiGroupList = self.fetch(GROUPS_PREFIX).await?;
        for group in &groups.groups {
            self.collect_group_version(
                GROUPS_PREFIX,
                &group.preferred_version.group_version,
                &mut live,
            )
            .await?;
        }

        tracing::info!(
            "found {} live objects in {} legacy versions and {} groups",
            live.len(),
            legacy.versions.len(),
            groups.groups.len()
        );
        Ok(live)
    }

    async fn collect_group_version(
        &self,
        prefix: &str,
        group_version: &str,
        live: &mut Vec<ResourceId>,
    ) -> Result<()> {
        let list: ApiResourceList = self.fetch(&format!("{}/{}", prefix, group_version)).await?;

        for resource in list
            .resources
            .iter()
            .filter(|r| is_enumerated(group_version, r))
        {
            let path = format!("{}/{}/{}", prefix, group_version, resource.name);
            let objects: ObjectList = self.fetch(&path).await?;
            tracing::debug!("{}: {} objects", path, objects.items.len());

            live.extend(objects.items.into_iter().map(|item| {
                ResourceId::new(
                    item.metadata.namespace,
                    group_version,
                    &resource.kind,
                    item.metadata.name,
                )
            }));
        }

        Ok(())
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let document = self.api.get_json(path).await?;
        discovery::parse(path, document)
    }
}

/// Whether objects of `resource` in `group_version` are part of live state
pub fn is_enumerated(group_version: &str, resource: &ApiResource) -> bool {
    if !resource.is_listable() || !resource.namespaced || resource.is_subresource() {
        return false;
    }
    group_version != EXTENSIONS_V1BETA1 || resource.kind == "Ingress"
}
