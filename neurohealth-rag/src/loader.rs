//! Knowledge-base loading and validation.
//!
//! A knowledge base is a JSON list of objects with `id`, `title`, `content`,
//! `source` and optional `tags` fields. Entries are validated in source order
//! and the first failure aborts the load. Duplicate ids are left to the caller.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::document::KnowledgeDocument;
use crate::error::{RagError, Result};

const REQUIRED_FIELDS: [&str; 4] = ["id", "title", "content", "source"];

/// Read and validate a knowledge-base JSON file.
///
/// # Errors
///
/// Returns [`RagError::Io`] if the file cannot be read, [`RagError::Json`] if it
/// is not JSON, and the validation errors of [`parse_documents`] otherwise.
pub fn load_documents(path: impl AsRef<Path>) -> Result<Vec<KnowledgeDocument>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading knowledge base");
    let raw = fs::read_to_string(path)?;
    let documents = load_documents_from_str(&raw)?;
    info!(path = %path.display(), document_count = documents.len(), "loaded knowledge base");
    Ok(documents)
}

/// Parse and validate a knowledge-base JSON document held in memory.
pub fn load_documents_from_str(json: &str) -> Result<Vec<KnowledgeDocument>> {
    let value: Value = serde_json::from_str(json)?;
    parse_documents(&value)
}

/// Validate an already-parsed knowledge collection.
///
/// # Errors
///
/// Returns [`RagError::MalformedCollection`] if `value` is not a non-empty list,
/// and [`RagError::MalformedDocument`] naming the 1-based entry that is not an
/// object, lacks a required field, or carries invalid tags.
pub fn parse_documents(value: &Value) -> Result<Vec<KnowledgeDocument>> {
    let entries = value.as_array().ok_or_else(|| {
        RagError::MalformedCollection("knowledge base must be a list of document objects".into())
    })?;

    if entries.is_empty() {
        return Err(RagError::MalformedCollection(
            "knowledge base must contain at least one document".into(),
        ));
    }

    entries.iter().enumerate().map(|(i, entry)| parse_entry(i + 1, entry)).collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<KnowledgeDocument> {
    let object = entry.as_object().ok_or_else(|| RagError::MalformedDocument {
        index,
        message: "entry is not an object".into(),
    })?;

    let [id, title, content, source] = REQUIRED_FIELDS.map(|field| required_text(object, field));

    Ok(KnowledgeDocument {
        id: id.map_err(|m| RagError::MalformedDocument { index, message: m })?,
        title: title.map_err(|m| RagError::MalformedDocument { index, message: m })?,
        content: content.map_err(|m| RagError::MalformedDocument { index, message: m })?,
        source: source.map_err(|m| RagError::MalformedDocument { index, message: m })?,
        tags: tags(object).map_err(|m| RagError::MalformedDocument { index, message: m })?,
    })
}

fn required_text(object: &Map<String, Value>, field: &str) -> std::result::Result<String, String> {
    match object.get(field) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::String(_)) => Err(format!("field '{field}' must not be empty")),
        Some(_) => Err(format!("field '{field}' must be a string")),
        None => Err(format!("missing required field '{field}'")),
    }
}

fn tags(object: &Map<String, Value>) -> std::result::Result<Vec<String>, String> {
    let Some(raw) = object.get("tags") else {
        return Ok(Vec::new());
    };
    let items = raw.as_array().ok_or_else(|| "field 'tags' must be a list of strings".to_string())?;

    let mut tags = Vec::with_capacity(items.len());
    for item in items {
        let tag = item.as_str().ok_or_else(|| "field 'tags' must be a list of strings".to_string())?;
        let tag = tag.trim();
        if !tag.is_empty() {
            tags.push(tag.to_string());
        }
    }
    Ok(tags)
}
