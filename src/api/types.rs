use serde::Serialize;

use crate::domain::WatchStatus;
use crate::models::Drama;
use crate::services::validation::FieldError;
use crate::services::view::{EmptyState, FilterOptions, SummaryStats};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field_errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field_errors: Vec::new(),
        }
    }

    pub fn invalid(message: impl Into<String>, field_errors: Vec<FieldError>) -> Self {
        Self {
            field_errors,
            ..Self::error(message)
        }
    }
}

/// Filtered list plus the figures shown around it.
#[derive(Debug, Serialize)]
pub struct DramaListDto {
    pub dramas: Vec<Drama>,
    pub count: usize,
    pub total: usize,
    pub stats: SummaryStats,
    pub has_active_filters: bool,
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Serialize)]
pub struct RemoveResultDto {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct ChoiceDto<T> {
    pub value: T,
    pub label: String,
}

/// Values for populating filter and form choices.
#[derive(Debug, Serialize)]
pub struct OptionsDto {
    #[serde(flatten)]
    pub present: FilterOptions,
    pub statuses: Vec<ChoiceDto<WatchStatus>>,
    pub ratings: Vec<ChoiceDto<u8>>,
    pub catalog_countries: Vec<String>,
    pub catalog_genres: Vec<String>,
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Debug, Serialize)]
pub struct SystemStatusDto {
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub drama_count: usize,
    pub metrics_enabled: bool,
}
