//! In-memory `ClusterApi` for testing
//!
//! Serves canned JSON documents by path and records every request, so tests
//! can assert which endpoints were walked without a cluster.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::ClusterApi;
use crate::error::{KubeError, Result};

#[derive(Clone, Default)]
pub struct MockClusterApi {
    /// path -> document
    documents: Arc<RwLock<HashMap<String, Value>>>,
    /// Paths requested, in order
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockClusterApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` at `path`
    pub fn with(self, path: &str, document: Value) -> Self {
        self.insert(path, document);
        self
    }

    pub fn insert(&self, path: &str, document: Value) {
        let mut documents = self.documents.write().unwrap();
        documents.insert(path.to_string(), document);
    }

    /// Paths requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }

    pub fn was_requested(&self, path: &str) -> bool {
        self.requests.read().unwrap().iter().any(|p| p == path)
    }
}

#[async_trait]
impl ClusterApi for MockClusterApi {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.requests.write().unwrap().push(path.to_string());
        let documents = self.documents.read().unwrap();
        documents
            .get(path)
            .cloned()
            .ok_or_else(|| KubeError::HttpStatus {
                url: path.to_string(),
                status: 404,
                body: "not found".to_string(),
            })
    }
}
