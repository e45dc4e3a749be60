use super::ApiError;
use crate::domain::DramaId;

pub fn validate_drama_id(raw: &str) -> Result<DramaId, ApiError> {
    raw.parse::<DramaId>().map_err(|_| {
        ApiError::validation(format!(
            "Invalid drama ID: {}. ID must be a UUID",
            raw
        ))
    })
}
