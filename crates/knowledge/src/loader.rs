//! Knowledge base loading.
//!
//! The knowledge base is read once at startup from a JSON array (or a YAML
//! list for `.yaml`/`.yml` files) of question/answer/keyword records. Any
//! failure here is fatal: the service never runs on a partial or empty base.

use crate::types::KnowledgeEntry;
use std::path::Path;
use supportbot_core::{AppError, AppResult};

/// Immutable, non-empty set of knowledge entries.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Wrap `entries`, rejecting an empty list.
    pub fn new(entries: Vec<KnowledgeEntry>) -> AppResult<Self> {
        if entries.is_empty() {
            return Err(AppError::Knowledge(
                "Knowledge base contains no entries".to_string(),
            ));
        }

        for (position, entry) in entries.iter().enumerate() {
            if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
                tracing::warn!("Knowledge entry {} has a blank question or answer", position);
            }
        }

        Ok(Self { entries })
    }

    /// Load the knowledge base at `path`.
    pub fn load(path: &Path) -> AppResult<Self> {
        tracing::debug!("Loading knowledge base from {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read knowledge base {:?}: {}", path, e))
        })?;

        let entries = parse_entries(path, &contents)?;
        let base = Self::new(entries)
            .map_err(|e| AppError::Knowledge(format!("{} ({:?})", e, path)))?;

        tracing::info!("Loaded {} knowledge entries from {:?}", base.len(), path);

        Ok(base)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entries(path: &Path, contents: &str) -> AppResult<Vec<KnowledgeEntry>> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(contents).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse knowledge base {:?}: {}", path, e))
        })
    } else {
        serde_json::from_str(contents).map_err(|e| {
            AppError::Knowledge(format!("Failed to parse knowledge base {:?}: {}", path, e))
        })
    }
}
