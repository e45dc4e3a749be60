//! Filter/derive engine.
//!
//! [`derive_view`] is a pure function of the record collection and the current
//! [`FilterCriteria`]. It yields the matching records in insertion order and
//! summary statistics over the whole collection. [`filter_options`] derives the
//! values that populate the year, country and genre filter choices.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{Rating, WatchStatus};
use crate::models::Drama;
use crate::services::validation::ValidationErrors;

/// Sentinel accepted in raw criteria to mean "no filter".
pub const ALL: &str = "all";

/// Current filter selections. `None` (or an empty search) means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: String,
    pub status: Option<WatchStatus>,
    pub year: Option<i32>,
    pub min_rating: Option<Rating>,
    pub country: Option<String>,
    pub genre: Option<String>,
}

/// Criteria as text inputs deliver them: `all` or empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawCriteria {
    pub search: Option<String>,
    pub status: Option<String>,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub country: Option<String>,
    pub genre: Option<String>,
}

fn concrete(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

impl FilterCriteria {
    /// Parses text criteria.
    ///
    /// # Errors
    ///
    /// Returns field errors for a status outside the known set or a year or
    /// rating threshold that is not a number.
    pub fn from_raw(raw: &RawCriteria) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut criteria = Self {
            search: raw.search.clone().unwrap_or_default(),
            ..Self::default()
        };

        if let Some(status) = concrete(raw.status.as_deref()) {
            match status.parse() {
                Ok(status) => criteria.status = Some(status),
                Err(e) => errors.push("status", format!("{e}")),
            }
        }

        if let Some(year) = concrete(raw.year.as_deref()) {
            match year.trim().parse() {
                Ok(year) => criteria.year = Some(year),
                Err(_) => errors.push("year", format!("Year filter must be a number, got '{year}'")),
            }
        }

        if let Some(rating) = concrete(raw.rating.as_deref()) {
            match rating.trim().parse::<i64>().map(Rating::try_from) {
                Ok(Ok(rating)) => criteria.min_rating = Some(rating),
                Ok(Err(e)) => errors.push("rating", e.to_string()),
                Err(_) => errors.push(
                    "rating",
                    format!("Rating filter must be a number, got '{rating}'"),
                ),
            }
        }

        criteria.country = concrete(raw.country.as_deref()).map(str::to_string);
        criteria.genre = concrete(raw.genre.as_deref()).map(str::to_string);

        if errors.is_empty() {
            Ok(criteria)
        } else {
            Err(errors)
        }
    }

    /// Sets one criterion from its text form; `all` or empty unsets it.
    ///
    /// # Errors
    ///
    /// Same rules as [`FilterCriteria::from_raw`]; an unknown key is reported
    /// against the `filter` field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ValidationErrors> {
        let mut raw = RawCriteria::default();
        let slot = match key {
            "search" => {
                self.search = value.to_string();
                return Ok(());
            }
            "status" => &mut raw.status,
            "year" => &mut raw.year,
            "rating" | "min_rating" => &mut raw.rating,
            "country" => &mut raw.country,
            "genre" => &mut raw.genre,
            other => {
                return Err(ValidationErrors::single(
                    "filter",
                    format!(
                        "Unknown filter '{other}'. Filters: search, status, year, rating, country, genre"
                    ),
                ));
            }
        };
        *slot = Some(value.to_string());
        let parsed = Self::from_raw(&raw)?;

        match key {
            "status" => self.status = parsed.status,
            "year" => self.year = parsed.year,
            "country" => self.country = parsed.country,
            "genre" => self.genre = parsed.genre,
            _ => self.min_rating = parsed.min_rating,
        }
        Ok(())
    }

    /// Resets every criterion to unset.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no criterion, search included, is set.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.search.is_empty() && !self.has_active_filters()
    }

    /// True when any criterion other than the search text is set.
    #[must_use]
    pub const fn has_active_filters(&self) -> bool {
        self.status.is_some()
            || self.year.is_some()
            || self.min_rating.is_some()
            || self.country.is_some()
            || self.genre.is_some()
    }

    /// Whether `drama` passes every criterion.
    #[must_use]
    pub fn matches(&self, drama: &Drama) -> bool {
        self.matches_search(drama)
            && self.status.is_none_or(|s| drama.status == s)
            && self.year.is_none_or(|y| drama.year == y)
            && self.min_rating.is_none_or(|r| drama.rating >= r)
            && self
                .country
                .as_deref()
                .is_none_or(|c| drama.country.as_deref() == Some(c))
            && self
                .genre
                .as_deref()
                .is_none_or(|g| drama.genre.as_deref() == Some(g))
    }

    fn matches_search(&self, drama: &Drama) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        drama.title.to_lowercase().contains(&needle)
            || drama
                .opinion
                .as_deref()
                .is_some_and(|o| o.to_lowercase().contains(&needle))
    }
}

/// Aggregates over the full, unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub watched: usize,
    pub watching: usize,
    pub want_to_watch: usize,
    pub average_rating: f64,
}

impl SummaryStats {
    /// Counts per status and mean rating; the mean of nothing is 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(records: &[Drama]) -> Self {
        let mut stats = Self::default();
        let mut rating_sum: u64 = 0;

        for drama in records {
            match drama.status {
                WatchStatus::Watched => stats.watched += 1,
                WatchStatus::Watching => stats.watching += 1,
                WatchStatus::WantToWatch => stats.want_to_watch += 1,
            }
            rating_sum += u64::from(drama.rating.value());
        }

        if !records.is_empty() {
            stats.average_rating = rating_sum as f64 / records.len() as f64;
        }
        stats
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.watched + self.watching + self.want_to_watch
    }

    /// Average rating rounded for display, e.g. `4.5`.
    #[must_use]
    pub fn average_display(&self) -> String {
        format!("{:.1}", self.average_rating)
    }
}

/// Why a derived view has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    NoRecords,
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    pub dramas: Vec<Drama>,
    pub total: usize,
    pub stats: SummaryStats,
}

impl DerivedView {
    #[must_use]
    pub fn empty_state(&self) -> Option<EmptyState> {
        match (self.dramas.is_empty(), self.total) {
            (false, _) => None,
            (true, 0) => Some(EmptyState::NoRecords),
            (true, _) => Some(EmptyState::NoMatches),
        }
    }
}

/// Applies `criteria` to `records` and computes summary statistics.
#[must_use]
pub fn derive_view(records: &[Drama], criteria: &FilterCriteria) -> DerivedView {
    DerivedView {
        dramas: records
            .iter()
            .filter(|d| criteria.matches(d))
            .cloned()
            .collect(),
        total: records.len(),
        stats: SummaryStats::compute(records),
    }
}

/// Distinct values present in the collection, for populating filter choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Newest first.
    pub years: Vec<i32>,
    /// First-appearance order.
    pub countries: Vec<String>,
    /// First-appearance order.
    pub genres: Vec<String>,
}

#[must_use]
pub fn filter_options(records: &[Drama]) -> FilterOptions {
    let mut years: Vec<i32> = records.iter().map(|d| d.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    FilterOptions {
        years,
        countries: distinct_present(records.iter().map(|d| d.country.as_deref())),
        genres: distinct_present(records.iter().map(|d| d.genre.as_deref())),
    }
}

fn distinct_present<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Label for a minimum-rating choice, e.g. `★★★☆☆ (3+ estrelas)`.
#[must_use]
pub fn rating_filter_label(rating: Rating) -> String {
    let suffix = match rating.value() {
        5 => "(5 estrelas)".to_string(),
        1 => "(1+ estrela)".to_string(),
        n => format!("({n}+ estrelas)"),
    };
    format!("{} {suffix}", rating.stars())
}
