//! Domain types for drama tracking with strong typing.
//!
//! This module provides type-safe wrappers and domain primitives for the
//! tracker. It follows the Newtype pattern so that identifiers, ratings and
//! statuses cannot be confused with plain strings and integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::constants;

/// Unique identifier for a Drama record.
///
/// Assigned once at insert time and never changed afterwards.
///
/// # Examples
///
/// ```rust
/// use doramas::domain::DramaId;
///
/// let id = DramaId::new();
/// let parsed: DramaId = id.to_string().parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DramaId(Uuid);

impl DramaId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Leading characters of the id, enough to tell records apart in listings.
    #[must_use]
    pub fn short(&self) -> String {
        let mut s = self.0.simple().to_string();
        s.truncate(constants::shell::SHORT_ID_LEN);
        s
    }
}

impl Default for DramaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DramaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DramaId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Watch status of a drama.
///
/// Serialized exactly as `want-to-watch`, `watching` and `watched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchStatus {
    #[default]
    WantToWatch,
    Watching,
    Watched,
}

impl WatchStatus {
    pub const ALL: [Self; 3] = [Self::WantToWatch, Self::Watching, Self::Watched];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WantToWatch => "want-to-watch",
            Self::Watching => "watching",
            Self::Watched => "watched",
        }
    }

    /// Human label in the application's locale.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WantToWatch => "Quero Assistir",
            Self::Watching => "Assistindo",
            Self::Watched => "Assistido",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status '{0}'. Expected one of: want-to-watch, watching, watched")]
pub struct UnknownStatus(pub String);

impl FromStr for WatchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownStatus(needle.to_string()))
    }
}

/// Star rating between 0 and 5 inclusive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rating {0} is out of range (0-5)")]
pub struct RatingOutOfRange(pub i64);

impl Rating {
    pub const MAX: Self = Self(constants::rating::MAX);

    /// Returns `None` when `value` exceeds the five-star scale.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= constants::rating::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Renders the rating as filled and empty stars, e.g. `★★★☆☆`.
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(constants::rating::MAX) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(RatingOutOfRange(i64::from(value)))
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(RatingOutOfRange(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drama_id_round_trips_through_display() {
        let id = DramaId::new();
        let parsed: DramaId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().replace('-', "").starts_with(&id.short()));
    }

    #[test]
    fn drama_ids_are_unique() {
        assert_ne!(DramaId::new(), DramaId::new());
    }

    #[test]
    fn watch_status_parsing() {
        assert_eq!("watched".parse::<WatchStatus>(), Ok(WatchStatus::Watched));
        assert_eq!(" Watching ".parse::<WatchStatus>(), Ok(WatchStatus::Watching));
        assert_eq!(
            "want-to-watch".parse::<WatchStatus>(),
            Ok(WatchStatus::WantToWatch)
        );
        assert!("dropped".parse::<WatchStatus>().is_err());
    }

    #[test]
    fn watch_status_serializes_kebab_case() {
        let json = serde_json::to_string(&WatchStatus::WantToWatch).unwrap();
        assert_eq!(json, "\"want-to-watch\"");
        let status: WatchStatus = serde_json::from_str("\"watched\"").unwrap();
        assert_eq!(status, WatchStatus::Watched);
    }

    #[test]
    fn rating_bounds() {
        assert!(Rating::new(0).is_some());
        assert!(Rating::new(5).is_some());
        assert!(Rating::new(6).is_none());
        assert!(Rating::try_from(-1_i64).is_err());
        assert_eq!(Rating::try_from(3_i64).unwrap().value(), 3);
    }

    #[test]
    fn rating_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn rating_stars() {
        assert_eq!(Rating::new(3).unwrap().stars(), "★★★☆☆");
        assert_eq!(Rating::default().stars(), "☆☆☆☆☆");
    }
}
