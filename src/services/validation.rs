//! Entry-time validation of the create/edit form.
//!
//! Every rule is checked and all failures are reported together, keyed by
//! field, so a front end can show each message next to its input.

use chrono::{Datelike, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::config::CatalogConfig;
use crate::domain::{Rating, WatchStatus};
use crate::models::{DramaForm, DramaFormInput, NumberInput};

/// Inclusive range of release years accepted at entry time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    #[must_use]
    pub const fn for_current_year(current_year: i32, min: i32, years_ahead: i32) -> Self {
        Self {
            min,
            max: current_year + years_ahead,
        }
    }

    /// Range relative to today's year.
    #[must_use]
    pub fn from_catalog(catalog: &CatalogConfig) -> Self {
        Self::for_current_year(Utc::now().year(), catalog.min_year, catalog.years_ahead)
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// [`validate_form`] for a submission arriving from a surface: rejections are
/// logged and counted before being handed back.
///
/// # Errors
///
/// Same as [`validate_form`].
pub fn check_submission(
    input: &DramaFormInput,
    years: YearRange,
) -> Result<DramaForm, ValidationErrors> {
    validate_form(input, years).inspect_err(|errors| {
        metrics::counter!("drama_validation_failures_total").increment(1);
        warn!(%errors, title = %input.title.trim(), "Rejected drama form");
    })
}

/// Validates a raw form submission into typed form data.
///
/// # Errors
///
/// Returns every failed rule: missing title, missing or out-of-range year,
/// unknown status, rating outside 0-5, non-numeric or non-positive episodes.
pub fn validate_form(
    input: &DramaFormInput,
    years: YearRange,
) -> Result<DramaForm, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = input.title.trim();
    if title.is_empty() {
        errors.push("title", "Title is required");
    }

    let year = match input.year.as_ref().map(NumberInput::parse) {
        None | Some(Ok(None)) => {
            errors.push("year", "Year is required");
            None
        }
        Some(Err(raw)) => {
            errors.push("year", format!("Year must be a number, got '{raw}'"));
            None
        }
        Some(Ok(Some(value))) => match i32::try_from(value) {
            Ok(year) if year < years.min => {
                errors.push("year", format!("Year must be {} or later", years.min));
                None
            }
            Ok(year) if year > years.max => {
                errors.push("year", format!("Year must be {} or earlier", years.max));
                None
            }
            Ok(year) => Some(year),
            Err(_) => {
                errors.push("year", "Year is out of range");
                None
            }
        },
    };

    let status = match input.status.as_deref().map(str::trim) {
        None | Some("") => Some(WatchStatus::default()),
        Some(raw) => match raw.parse::<WatchStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                errors.push("status", e.to_string());
                None
            }
        },
    };

    let rating = match input.rating.as_ref().map(NumberInput::parse) {
        None | Some(Ok(None)) => Some(Rating::default()),
        Some(Err(raw)) => {
            errors.push("rating", format!("Rating must be a number, got '{raw}'"));
            None
        }
        Some(Ok(Some(value))) => match Rating::try_from(value) {
            Ok(rating) => Some(rating),
            Err(e) => {
                errors.push("rating", e.to_string());
                None
            }
        },
    };

    let episodes = match input.episodes.as_ref().map(NumberInput::parse) {
        None | Some(Ok(None)) => None,
        Some(Err(raw)) => {
            errors.push(
                "episodes",
                format!("Episode count must be a number, got '{raw}'"),
            );
            None
        }
        Some(Ok(Some(value))) => match u32::try_from(value) {
            Ok(count) if count > 0 => Some(count),
            _ => {
                errors.push("episodes", "Episode count must be a positive number");
                None
            }
        },
    };

    match (year, status, rating) {
        (Some(year), Some(status), Some(rating)) if errors.is_empty() => Ok(DramaForm {
            title: title.to_string(),
            year,
            status,
            rating,
            opinion: optional_text(input.opinion.as_deref()),
            poster: optional_text(input.poster.as_deref()),
            genre: optional_text(input.genre.as_deref()),
            country: optional_text(input.country.as_deref()),
            episodes,
        }),
        _ => Err(errors),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
