//! Canonical identity of a namespaced Kubernetes resource

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Separator between the fields of a canonical identifier
pub const SEPARATOR: char = ':';

/// Identity of a namespaced resource: `(namespace, apiVersion, kind, name)`
///
/// The canonical form joins the fields with `:` and is the unit of comparison,
/// filtering and display. Fields are not escaped: Kubernetes namespaces, kinds
/// and object names cannot contain `:`, and `apiVersion` only uses `/` and `.`,
/// so the joined form stays unambiguous for anything a cluster can hold.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub namespace: String,
    pub api_version: String,
    pub kind: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(
        namespace: impl Into<String>,
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            api_version: api_version.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// `namespace:apiVersion:kind:name`
    pub fn canonical(&self) -> String {
        let mut out = String::with_capacity(
            self.namespace.len() + self.api_version.len() + self.kind.len() + self.name.len() + 3,
        );
        out.push_str(&self.namespace);
        out.push(SEPARATOR);
        out.push_str(&self.api_version);
        out.push(SEPARATOR);
        out.push_str(&self.kind);
        out.push(SEPARATOR);
        out.push_str(&self.name);
        out
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.namespace, self.api_version, self.kind, self.name
        )
    }
}

/// Build the set of canonical strings for a list of identifiers
pub fn canonical_set<'a, I>(ids: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a ResourceId>,
{
    ids.into_iter().map(ResourceId::canonical).collect()
}
