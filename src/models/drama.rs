use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DramaId, Rating, WatchStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drama {
    pub id: DramaId,
    pub title: String,
    pub year: i32,
    pub status: WatchStatus,
    pub rating: Rating,
    pub opinion: Option<String>,
    pub poster: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub episodes: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Drama {
    /// Builds a new record from validated form data.
    #[must_use]
    pub fn from_form(form: DramaForm, now: DateTime<Utc>) -> Self {
        Self {
            id: DramaId::new(),
            title: form.title,
            year: form.year,
            status: form.status,
            rating: form.rating,
            opinion: form.opinion,
            poster: form.poster,
            genre: form.genre,
            country: form.country,
            episodes: form.episodes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping identity and creation time.
    pub fn apply(&mut self, form: DramaForm, now: DateTime<Utc>) {
        self.title = form.title;
        self.year = form.year;
        self.status = form.status;
        self.rating = form.rating;
        self.opinion = form.opinion;
        self.poster = form.poster;
        self.genre = form.genre;
        self.country = form.country;
        self.episodes = form.episodes;
        self.updated_at = now;
    }

    /// The editable part of the record, as a pre-filled edit form would show it.
    #[must_use]
    pub fn to_form(&self) -> DramaForm {
        DramaForm {
            title: self.title.clone(),
            year: self.year,
            status: self.status,
            rating: self.rating,
            opinion: self.opinion.clone(),
            poster: self.poster.clone(),
            genre: self.genre.clone(),
            country: self.country.clone(),
            episodes: self.episodes,
        }
    }
}

/// Validated form data: every field of [`Drama`] except identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DramaForm {
    pub title: String,
    pub year: i32,
    pub status: WatchStatus,
    pub rating: Rating,
    pub opinion: Option<String>,
    pub poster: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub episodes: Option<u32>,
}

impl DramaForm {
    /// Defaults offered when adding a new entry.
    #[must_use]
    pub fn blank(current_year: i32) -> Self {
        Self {
            title: String::new(),
            year: current_year,
            status: WatchStatus::default(),
            rating: Rating::default(),
            opinion: None,
            poster: None,
            genre: None,
            country: None,
            episodes: None,
        }
    }

    #[must_use]
    pub fn titled(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            ..Self::blank(year)
        }
    }
}
