//! Discovery documents served by the API server
//!
//! Only the fields enumeration relies on are modelled; they are all required,
//! so a response missing one fails deserialization instead of being skipped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KubeError, Result};

/// `GET /api`: versions of the legacy (core) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiVersions {
    pub versions: Vec<String>,
}

/// `GET /apis`: named API groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiGroupList {
    pub groups: Vec<ApiGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGroup {
    #[serde(default)]
    pub name: String,
    pub preferred_version: GroupVersionForDiscovery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupVersionForDiscovery {
    /// `group/version`, e.g. `apps/v1`
    pub group_version: String,
    #[serde(default)]
    pub version: String,
}

/// `GET /api/{version}` or `GET /apis/{group}/{version}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResourceList {
    pub resources: Vec<ApiResource>,
}

/// A resource kind served by a group version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Plural resource name used in paths; subresources contain a `/`
    pub name: String,
    pub kind: String,
    pub namespaced: bool,
    pub verbs: Vec<String>,
}

impl ApiResource {
    pub fn is_listable(&self) -> bool {
        self.verbs.iter().any(|v| v == "list")
    }

    /// `pods/log`, `deployments/scale`, ...
    pub fn is_subresource(&self) -> bool {
        self.name.contains('/')
    }
}

/// Any `...List` response; only object identities are read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectList {
    pub items: Vec<ListedObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedObject {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
}

/// Deserialize a fetched document, attributing failures to its path
pub fn parse<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| KubeError::unexpected(path, e))
}
