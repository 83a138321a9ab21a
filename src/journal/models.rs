use serde::{Deserialize, Serialize};

use super::error::JournalError;

/// Mood and summary computed by the service after an entry is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub mood: String,
    pub summary: String,
    /// One actionable insight, when the analyzer produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_insights: Option<String>,
}

/// Request body for saving an entry
#[derive(Serialize, Debug)]
pub struct SaveEntryRequest<'a> {
    pub content: &'a str,
}

/// What a save produced, decoded once at the service boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored and analyzed
    Success { entry: String, analysis: Analysis },

    /// Stored, but the analysis step failed or was skipped
    PartialSuccess { entry: String },

    /// The service used a status value we don't know about
    Unrecognized(String),
}

/// Raw save envelope as it comes off the wire
#[derive(Deserialize, Debug)]
struct SaveEnvelope {
    status: String,
    #[serde(default)]
    data: Option<SaveData>,
}

#[derive(Deserialize, Debug)]
struct SaveData {
    #[serde(default)]
    entry: Option<EntryRow>,
    #[serde(default)]
    analysis: Option<Analysis>,
}

/// A stored entry row. The service sends the whole database row; only the
/// text matters to the save flow.
#[derive(Deserialize, Debug)]
struct EntryRow {
    entry: String,
}

impl SaveOutcome {
    /// Decode a 2xx response body from `POST /journal-entry`.
    pub fn decode(body: &str) -> Result<Self, JournalError> {
        let envelope: SaveEnvelope = serde_json::from_str(body)?;

        match envelope.status.as_str() {
            "success" => {
                let data = envelope
                    .data
                    .ok_or_else(|| JournalError::Shape("success without data".to_string()))?;
                let entry = data
                    .entry
                    .ok_or_else(|| JournalError::Shape("success without entry".to_string()))?;
                let analysis = data
                    .analysis
                    .ok_or_else(|| JournalError::Shape("success without analysis".to_string()))?;
                Ok(SaveOutcome::Success {
                    entry: entry.entry,
                    analysis,
                })
            }
            "partial_success" => {
                let entry = envelope
                    .data
                    .and_then(|data| data.entry)
                    .ok_or_else(|| {
                        JournalError::Shape("partial_success without entry".to_string())
                    })?;
                Ok(SaveOutcome::PartialSuccess { entry: entry.entry })
            }
            other => Ok(SaveOutcome::Unrecognized(other.to_string())),
        }
    }
}

/// Filters for `GET /entries`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl EntryQuery {
    /// Query-string pairs for the filters that are set
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", &self.search),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

/// One row from `GET /entries`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryRecord {
    /// Row id, needed to delete the entry
    #[serde(default)]
    pub id: Option<String>,
    pub entry: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub journal_analyses: Vec<Analysis>,
}

impl EntryRecord {
    /// `YYYY-MM-DD` part of the timestamp, if there is one
    pub fn date(&self) -> Option<&str> {
        self.created_at
            .as_deref()
            .map(|ts| ts.get(..10).unwrap_or(ts))
    }

    /// First line of the entry, for list rows
    pub fn headline(&self) -> &str {
        self.entry.lines().next().unwrap_or("")
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.journal_analyses.first()
    }

    pub fn mood(&self) -> Option<&str> {
        self.analysis().map(|a| a.mood.as_str())
    }
}

/// Body of `DELETE /entries/{id}`
#[derive(Debug, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
}

/// Body of `GET /`
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: String,
}
