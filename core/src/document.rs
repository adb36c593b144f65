use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller-supplied document identifier. Negative values are rejected on input.
pub type DocId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Actual => "ACTUAL",
            DocumentStatus::Irrelevant => "IRRELEVANT",
            DocumentStatus::Banned => "BANNED",
            DocumentStatus::Removed => "REMOVED",
        };
        f.write_str(name)
    }
}

impl FromStr for DocumentStatus {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            _ => Err(SearchError::InvalidStatus(s.to_string())),
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Stored metadata for a live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub content: String,
    pub rating: i32,
    pub status: DocumentStatus,
}

/// Arithmetic mean truncated toward zero; 0 for no ratings.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_truncates_toward_zero() {
        assert_eq!(average_rating(&[]), 0);
        assert_eq!(average_rating(&[7, 2, 7]), 5);
        assert_eq!(average_rating(&[1, 2]), 1);
        assert_eq!(average_rating(&[-1, -2]), -1);
        assert_eq!(average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("banned".parse::<DocumentStatus>().unwrap(), DocumentStatus::Banned);
        assert_eq!("ACTUAL".parse::<DocumentStatus>().unwrap(), DocumentStatus::Actual);
        assert!("gone".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&DocumentStatus::Irrelevant).unwrap();
        assert_eq!(json, "\"IRRELEVANT\"");
    }

    #[test]
    fn document_display() {
        let doc = Document::new(2, 0.5, -3);
        assert_eq!(doc.to_string(), "{ document_id = 2, relevance = 0.5, rating = -3 }");
    }
}
