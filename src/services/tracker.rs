//! Session controller: the single owner of the record collection and the
//! current filter criteria.

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::domain::DramaId;
use crate::models::{Drama, DramaForm, DramaFormInput};
use crate::services::collection::{Clock, DramaCollection, DramaError};
use crate::services::validation::{YearRange, check_submission};
use crate::services::view::{DerivedView, FilterCriteria, FilterOptions, derive_view, filter_options};

#[derive(Debug, Default)]
pub struct Tracker {
    collection: DramaCollection,
    criteria: FilterCriteria,
    catalog: CatalogConfig,
}

impl Tracker {
    #[must_use]
    pub fn new(catalog: CatalogConfig) -> Self {
        Self {
            collection: DramaCollection::new(),
            criteria: FilterCriteria::default(),
            catalog,
        }
    }

    #[must_use]
    pub fn with_clock(catalog: CatalogConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: DramaCollection::with_clock(clock),
            criteria: FilterCriteria::default(),
            catalog,
        }
    }

    #[must_use]
    pub fn years(&self) -> YearRange {
        YearRange::from_catalog(&self.catalog)
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Validates a create submission and inserts it.
    ///
    /// # Errors
    ///
    /// Returns [`DramaError::Validation`] with every failed field.
    pub fn add(&mut self, input: &DramaFormInput) -> Result<Drama, DramaError> {
        let form = self.validate(input)?;
        Ok(self.insert(form))
    }

    /// Validates an edit submission and replaces the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DramaError::Validation`] for bad input and
    /// [`DramaError::NotFound`] when the record no longer exists.
    pub fn edit(&mut self, id: DramaId, input: &DramaFormInput) -> Result<Drama, DramaError> {
        let form = self.validate(input)?;
        self.update(id, form)
    }

    pub fn insert(&mut self, form: DramaForm) -> Drama {
        self.collection.insert(form)
    }

    /// # Errors
    ///
    /// Returns [`DramaError::NotFound`] when no record has `id`.
    pub fn update(&mut self, id: DramaId, form: DramaForm) -> Result<Drama, DramaError> {
        self.collection.update(id, form)
    }

    pub fn remove(&mut self, id: DramaId) -> Option<Drama> {
        self.collection.remove(id)
    }

    #[must_use]
    pub fn get(&self, id: DramaId) -> Option<&Drama> {
        self.collection.get(id)
    }

    /// # Errors
    ///
    /// See [`DramaCollection::resolve`].
    pub fn resolve(&self, prefix: &str) -> Result<&Drama, DramaError> {
        self.collection.resolve(prefix)
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Sets one criterion from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`DramaError::Validation`] for an unknown key or bad value.
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<(), DramaError> {
        self.criteria.set(key, value)?;
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    /// Filtered records and statistics for the current criteria.
    #[must_use]
    pub fn view(&self) -> DerivedView {
        derive_view(self.collection.records(), &self.criteria)
    }

    #[must_use]
    pub fn options(&self) -> FilterOptions {
        filter_options(self.collection.records())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    fn validate(&self, input: &DramaFormInput) -> Result<DramaForm, DramaError> {
        check_submission(input, self.years()).map_err(DramaError::Validation)
    }
}
