use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DramaForm;

/// A numeric form field as submitted: either a number or free text typed into
/// a number box. Text is parsed during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Int(i64),
    /// JSON clients may send `2016.0`; only whole values are accepted.
    Float(f64),
    Text(String),
}

impl NumberInput {
    /// `Ok(None)` for blank text, `Err` for text that is not an integer.
    pub fn parse(&self) -> Result<Option<i64>, String> {
        match self {
            Self::Int(n) => Ok(Some(*n)),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(Some(*f as i64)),
            Self::Float(f) => Err(f.to_string()),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed.parse::<i64>().map(Some).map_err(|_| trimmed.to_string())
            }
        }
    }
}

impl From<i64> for NumberInput {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for NumberInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Raw create/edit form submission, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DramaFormInput {
    pub title: String,
    pub year: Option<NumberInput>,
    pub status: Option<String>,
    pub rating: Option<NumberInput>,
    pub opinion: Option<String>,
    pub poster: Option<String>,
    pub genre: Option<String>,
    pub country: Option<String>,
    pub episodes: Option<NumberInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field '{0}'. Fields: {fields}", fields = DramaFormInput::FIELDS.join(", "))]
pub struct UnknownField(pub String);

impl DramaFormInput {
    pub const FIELDS: [&'static str; 9] = [
        "title", "year", "status", "rating", "opinion", "poster", "genre", "country", "episodes",
    ];

    /// Pre-fills the form with an existing record's values, as the edit dialog does.
    #[must_use]
    pub fn from_form(form: &DramaForm) -> Self {
        Self {
            title: form.title.clone(),
            year: Some(NumberInput::Int(i64::from(form.year))),
            status: Some(form.status.to_string()),
            rating: Some(NumberInput::Int(i64::from(form.rating.value()))),
            opinion: form.opinion.clone(),
            poster: form.poster.clone(),
            genre: form.genre.clone(),
            country: form.country.clone(),
            episodes: form.episodes.map(|e| NumberInput::Int(i64::from(e))),
        }
    }

    /// Sets one field from its textual value. An empty value clears optional fields.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), UnknownField> {
        let text = || {
            if value.trim().is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        match field {
            "title" => self.title = value.to_string(),
            "year" => self.year = Some(NumberInput::from(value)),
            "status" => self.status = Some(value.to_string()),
            "rating" => self.rating = Some(NumberInput::from(value)),
            "opinion" => self.opinion = text(),
            "poster" => self.poster = text(),
            "genre" => self.genre = text(),
            "country" => self.country = text(),
            "episodes" => self.episodes = Some(NumberInput::from(value)),
            other => return Err(UnknownField(other.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rating, WatchStatus};

    #[test]
    fn number_input_accepts_numbers_and_text() {
        let from_json: NumberInput = serde_json::from_str("2015").unwrap();
        assert_eq!(from_json.parse(), Ok(Some(2015)));

        let from_text: NumberInput = serde_json::from_str("\" 16 \"").unwrap();
        assert_eq!(from_text.parse(), Ok(Some(16)));

        let whole: NumberInput = serde_json::from_str("2016.0").unwrap();
        assert_eq!(whole.parse(), Ok(Some(2016)));
        let fractional: NumberInput = serde_json::from_str("4.5").unwrap();
        assert_eq!(fractional.parse(), Err("4.5".to_string()));

        assert_eq!(NumberInput::from("").parse(), Ok(None));
        assert_eq!(NumberInput::from("abc").parse(), Err("abc".to_string()));
    }

    #[test]
    fn prefilled_form_keeps_values() {
        let mut form = DramaForm::titled("Reply 1988", 2015);
        form.status = WatchStatus::Watched;
        form.rating = Rating::new(5).unwrap();
        form.episodes = Some(20);

        let input = DramaFormInput::from_form(&form);
        assert_eq!(input.title, "Reply 1988");
        assert_eq!(input.year, Some(NumberInput::Int(2015)));
        assert_eq!(input.status.as_deref(), Some("watched"));
        assert_eq!(input.episodes, Some(NumberInput::Int(20)));
    }

    #[test]
    fn set_updates_and_clears_fields() {
        let mut input = DramaFormInput::default();
        input.set("genre", "Romance").unwrap();
        assert_eq!(input.genre.as_deref(), Some("Romance"));
        input.set("genre", "").unwrap();
        assert_eq!(input.genre, None);
        assert!(input.set("director", "x").is_err());
    }

    #[test]
    fn missing_json_fields_default() {
        let input: DramaFormInput = serde_json::from_str(r#"{"title":"Goblin"}"#).unwrap();
        assert_eq!(input.title, "Goblin");
        assert!(input.year.is_none());
    }
}
