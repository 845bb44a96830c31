//! Data models for catalog records.
//!
//! A [`CatalogEntry`] wraps one anime record as returned by the MyAnimeList
//! API; a [`ScoredEntry`] pairs it with the score a user gave it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Public page of an anime on MyAnimeList
pub const MAL_ANIME_URL: &str = "https://myanimelist.net/anime";

/// Errors raised while building a record wrapper
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("record field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("record is not an object")]
    NotAnObject,
}

/// Anime record from MyAnimeList
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    mal_id: u32,
    title: String,
    rating: Option<f64>,
}

impl CatalogEntry {
    /// Build an entry from a raw API record with `id`, `title` and `mean`.
    ///
    /// `mean` may be `null` for titles the catalog has not scored yet, but
    /// the key itself must be there.
    pub fn from_record(record: &Value) -> Result<Self, RecordError> {
        let map = record.as_object().ok_or(RecordError::NotAnObject)?;

        let id = map.get("id").ok_or(RecordError::MissingField("id"))?;
        let title = map.get("title").ok_or(RecordError::MissingField("title"))?;
        let mean = map.get("mean").ok_or(RecordError::MissingField("mean"))?;

        Ok(Self {
            mal_id: parse_id(id)?,
            title: title
                .as_str()
                .ok_or_else(|| invalid("title", "expected a string"))?
                .to_string(),
            rating: match mean {
                Value::Null => None,
                other => Some(
                    other
                        .as_f64()
                        .ok_or_else(|| invalid("mean", "expected a number"))?,
                ),
            },
        })
    }

    /// MyAnimeList ID
    pub fn mal_id(&self) -> u32 {
        self.mal_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Mean score on MyAnimeList
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Link to the anime's page on MyAnimeList
    pub fn mal_link(&self) -> String {
        format!("{}/{}", MAL_ANIME_URL, self.mal_id)
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Anime record together with the user's own score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    entry: CatalogEntry,
    user_rating: u32,
}

impl ScoredEntry {
    pub fn new(entry: CatalogEntry, user_rating: u32) -> Self {
        Self { entry, user_rating }
    }

    /// Build a scored entry straight from a raw API record
    pub fn from_record(record: &Value, user_rating: u32) -> Result<Self, RecordError> {
        Ok(Self::new(CatalogEntry::from_record(record)?, user_rating))
    }

    pub fn entry(&self) -> &CatalogEntry {
        &self.entry
    }

    pub fn title(&self) -> &str {
        self.entry.title()
    }

    pub fn mal_link(&self) -> String {
        self.entry.mal_link()
    }

    pub fn user_rating(&self) -> u32 {
        self.user_rating
    }
}

impl fmt::Display for ScoredEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.entry, f)
    }
}

/// On-disk shape of a pre-fetched record and the user's score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: Value,
    #[serde(default)]
    pub user_rating: u32,
}

impl TryFrom<&ScoredRecord> for ScoredEntry {
    type Error = RecordError;

    fn try_from(value: &ScoredRecord) -> Result<Self, Self::Error> {
        ScoredEntry::from_record(&value.record, value.user_rating)
    }
}

fn invalid(field: &'static str, reason: &str) -> RecordError {
    RecordError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

/// IDs come back as integers, but numeric strings are accepted too
fn parse_id(value: &Value) -> Result<u32, RecordError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid("id", "expected a non-negative 32-bit integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid("id", "expected a numeric string")),
        _ => Err(invalid("id", "expected an integer or string")),
    }
}
