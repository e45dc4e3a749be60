//! In-memory record store for drama entries.
//!
//! The collection owns every record and is only mutated through
//! [`DramaCollection::insert`], [`DramaCollection::update`] and
//! [`DramaCollection::remove`]. Insertion order is the only ordering.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::DramaId;
use crate::models::{Drama, DramaForm};
use crate::services::validation::ValidationErrors;

/// Domain errors for drama operations.
#[derive(Debug, Error)]
pub enum DramaError {
    #[error("Drama not found: {0}")]
    NotFound(DramaId),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("No drama id starts with '{0}'")]
    UnknownPrefix(String),

    #[error("Id prefix '{0}' matches more than one drama")]
    AmbiguousPrefix(String),
}

/// Source of timestamps for record lifecycle events.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct DramaCollection {
    records: Vec<Drama>,
    clock: Arc<dyn Clock>,
}

impl Default for DramaCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DramaCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DramaCollection")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl DramaCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Vec::new(),
            clock,
        }
    }

    /// Appends a new record with a fresh id and both timestamps set to now.
    pub fn insert(&mut self, form: DramaForm) -> Drama {
        let drama = Drama::from_form(form, self.clock.now());
        self.records.push(drama.clone());

        metrics::counter!("dramas_inserted_total").increment(1);
        info!(id = %drama.id, title = %drama.title, "Drama added");
        drama
    }

    /// Replaces every editable field of the record with `id`.
    ///
    /// The record keeps its id, creation time and position; `updated_at` is
    /// refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`DramaError::NotFound`] if no record has this id.
    pub fn update(&mut self, id: DramaId, form: DramaForm) -> Result<Drama, DramaError> {
        let now = self.clock.now();
        let drama = self
            .records
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(DramaError::NotFound(id))?;

        drama.apply(form, now);

        metrics::counter!("dramas_updated_total").increment(1);
        info!(id = %drama.id, title = %drama.title, "Drama updated");
        Ok(drama.clone())
    }

    /// Removes the record with `id`. A missing id is a no-op.
    pub fn remove(&mut self, id: DramaId) -> Option<Drama> {
        let Some(index) = self.records.iter().position(|d| d.id == id) else {
            debug!(%id, "Remove ignored, no such drama");
            return None;
        };

        let removed = self.records.remove(index);
        metrics::counter!("dramas_removed_total").increment(1);
        info!(id = %removed.id, title = %removed.title, "Drama removed");
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: DramaId) -> Option<&Drama> {
        self.records.iter().find(|d| d.id == id)
    }

    /// Finds the single record whose id starts with `prefix` (hyphens ignored).
    ///
    /// # Errors
    ///
    /// Returns [`DramaError::UnknownPrefix`] when nothing matches and
    /// [`DramaError::AmbiguousPrefix`] when more than one record does.
    pub fn resolve(&self, prefix: &str) -> Result<&Drama, DramaError> {
        let needle: String = prefix
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        if needle.is_empty() {
            return Err(DramaError::UnknownPrefix(prefix.to_string()));
        }

        let mut matches = self
            .records
            .iter()
            .filter(|d| d.id.as_uuid().simple().to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(drama), None) => Ok(drama),
            (Some(_), Some(_)) => Err(DramaError::AmbiguousPrefix(prefix.to_string())),
            (None, _) => Err(DramaError::UnknownPrefix(prefix.to_string())),
        }
    }

    /// Read-only view of all records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Drama] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
