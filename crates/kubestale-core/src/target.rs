//! Target state extraction from manifest streams
//!
//! Every document of a multi-document YAML stream that declares
//! `metadata.namespace` contributes one [`ResourceId`], read verbatim from its
//! `apiVersion`, `kind`, `metadata.namespace` and `metadata.name`. Documents
//! without a namespace are cluster-scoped (or rely on defaulting) and are
//! skipped.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::io::Read;
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::identifier::ResourceId;

/// Path argument that stands for standard input
pub const STDIN_PATH: &str = "-";

/// Extract namespaced resource identities from a manifest stream
pub fn extract_target(text: &str) -> Result<Vec<ResourceId>> {
    let mut ids = Vec::new();

    for (i, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let index = i + 1;
        let mut value = Value::deserialize(document)?;
        // `<<: *anchor` keys, e.g. a shared metadata block
        value.apply_merge()?;
        if let Some(id) = document_identity(index, &value)? {
            ids.push(id);
        }
    }

    Ok(ids)
}

/// Extract target state from any reader
pub fn read_target<R: Read>(mut reader: R) -> Result<Vec<ResourceId>> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| CoreError::io(STDIN_PATH, e))?;
    extract_target(&text)
}

/// Extract target state from a file, or from stdin when the path is `-`
pub fn read_target_path(path: &Path) -> Result<Vec<ResourceId>> {
    if path == Path::new(STDIN_PATH) {
        return read_target(std::io::stdin().lock());
    }
    let text = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    extract_target(&text)
}

fn document_identity(index: usize, document: &Value) -> Result<Option<ResourceId>> {
    if is_empty(document) {
        return Ok(None);
    }

    let root = document
        .as_mapping()
        .ok_or_else(|| CoreError::malformed(index, "document is not a mapping"))?;
    let metadata = root
        .get("metadata")
        .ok_or_else(|| CoreError::malformed(index, "missing field 'metadata'"))?
        .as_mapping()
        .ok_or_else(|| CoreError::malformed(index, "field 'metadata' is not a mapping"))?;

    if !metadata.contains_key("namespace") {
        return Ok(None);
    }

    Ok(Some(ResourceId::new(
        string_field(index, metadata, "namespace", "metadata.namespace")?,
        string_field(index, root, "apiVersion", "apiVersion")?,
        string_field(index, root, "kind", "kind")?,
        string_field(index, metadata, "name", "metadata.name")?,
    )))
}

fn string_field(index: usize, map: &Mapping, key: &str, display: &str) -> Result<String> {
    match map.get(key) {
        None => Err(CoreError::malformed(
            index,
            format!("missing field '{}'", display),
        )),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(CoreError::malformed(
            index,
            format!("field '{}' is empty", display),
        )),
        Some(_) => Err(CoreError::malformed(
            index,
            format!("field '{}' is not a string", display),
        )),
    }
}

fn is_empty(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Mapping(m) => m.is_empty(),
        Value::Sequence(s) => s.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
