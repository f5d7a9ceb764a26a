//! kubestale Kube - live state enumeration over the Kubernetes API
//!
//! This crate provides:
//! - **ClusterApi**: the "GET a path, get JSON back" seam, with an HTTP
//!   implementation (`HttpClusterApi`) and an in-memory one for tests
//! - **Discovery types**: the subset of the discovery documents kubestale reads
//! - **LiveStateEnumerator**: walks the legacy and named API groups and lists
//!   every namespaced object
//!
//! Enumeration is all-or-nothing: any failure aborts the snapshot.

pub mod api;
pub mod discovery;
pub mod enumerator;
pub mod error;
pub mod mock;

pub use api::{ClusterApi, HttpClusterApi};
pub use discovery::{ApiGroupList, ApiResource, ApiResourceList, ApiVersions, ObjectList};
pub use enumerator::{EXTENSIONS_V1BETA1, LiveStateEnumerator};
pub use error::{KubeError, Result};
pub use mock::MockClusterApi;
