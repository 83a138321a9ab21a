use tracing::{info, warn};

use super::error::JournalError;
use super::models::{EntryQuery, EntryRecord};

/// Past entries fetched from the service, with search and date filters
#[derive(Debug, Default)]
pub struct EntryHistory {
    pub search: String,
    /// `YYYY-MM-DD` or empty
    pub start_date: String,
    /// `YYYY-MM-DD` or empty
    pub end_date: String,
    pub entries: Vec<EntryRecord>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub visible: bool,
    /// Set when a save or delete may have changed what the service would return
    pub stale: bool,
    /// Entry waiting for the user to confirm its deletion
    pub confirm_delete: Option<String>,
    /// Entry whose delete request is in flight
    pub deleting: Option<String>,
}

fn is_iso_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn filter(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl EntryHistory {
    pub fn new() -> Self {
        Self {
            stale: true,
            ..Default::default()
        }
    }

    /// Start a fetch. Returns the filters to send, or None if a fetch is
    /// already running or the date range can't be sent.
    pub fn begin_refresh(&mut self) -> Option<EntryQuery> {
        if self.loading {
            return None;
        }
        self.stale = false;

        let query = EntryQuery {
            search: filter(&self.search),
            start_date: filter(&self.start_date),
            end_date: filter(&self.end_date),
        };

        for date in [&query.start_date, &query.end_date].into_iter().flatten() {
            if !is_iso_date(date) {
                self.last_error = Some(format!("'{}' is not a YYYY-MM-DD date", date));
                return None;
            }
        }
        // ISO dates order the same as strings
        if let (Some(start), Some(end)) = (&query.start_date, &query.end_date) {
            if end < start {
                self.last_error = Some("The end date is before the start date".to_string());
                return None;
            }
        }

        self.loading = true;
        Some(query)
    }

    pub fn settle(&mut self, result: Result<Vec<EntryRecord>, JournalError>) {
        self.loading = false;
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.last_error = None;
            }
            Err(e) => {
                warn!("Loading past entries failed: {}", e);
                self.last_error = Some(if e.is_transport() {
                    "Couldn't reach the journal service".to_string()
                } else {
                    "The journal service sent something unexpected".to_string()
                });
            }
        }
    }

    /// Ask for confirmation before deleting `id`
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.confirm_delete = Some(id.into());
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Turn the pending confirmation into a delete request. Returns the id to
    /// delete, or None if nothing is confirmed or a delete is still running.
    pub fn begin_delete(&mut self) -> Option<String> {
        if self.deleting.is_some() {
            return None;
        }
        let id = self.confirm_delete.take()?;
        self.deleting = Some(id.clone());
        Some(id)
    }

    pub fn settle_delete(&mut self, result: Result<(), JournalError>) {
        let Some(id) = self.deleting.take() else {
            warn!("Dropping delete result with no delete in flight");
            return;
        };
        match result {
            Ok(()) => {
                info!("Deleted entry {}", id);
                self.entries.retain(|record| record.id.as_deref() != Some(id.as_str()));
                self.last_error = None;
                self.mark_stale();
            }
            Err(e) => {
                warn!("Deleting entry {} failed: {}", id, e);
                self.last_error = Some("Couldn't delete the entry. Try again?".to_string());
            }
        }
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Whether opening the window should trigger a fetch
    pub fn needs_refresh(&self) -> bool {
        self.visible && self.stale && !self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> EntryRecord {
        EntryRecord {
            id: Some(format!("id-{}", text)),
            entry: text.to_string(),
            created_at: None,
            journal_analyses: Vec::new(),
        }
    }

    #[test]
    fn blank_search_sends_no_term() {
        let mut history = EntryHistory::new();
        history.search = "   ".to_string();
        assert_eq!(history.begin_refresh(), Some(EntryQuery::default()));
        assert!(history.loading);
    }

    #[test]
    fn search_term_is_trimmed() {
        let mut history = EntryHistory::new();
        history.search = "  beach ".to_string();
        history.start_date = "2024-06-01".to_string();
        history.end_date = " 2024-06-30 ".to_string();
        assert_eq!(
            history.begin_refresh(),
            Some(EntryQuery {
                search: Some("beach".to_string()),
                start_date: Some("2024-06-01".to_string()),
                end_date: Some("2024-06-30".to_string()),
            })
        );
    }

    #[test]
    fn bad_date_range_sends_nothing() {
        let mut history = EntryHistory::new();
        history.start_date = "2024-06-30".to_string();
        history.end_date = "2024-06-01".to_string();
        assert_eq!(history.begin_refresh(), None);
        assert!(!history.loading);
        assert_eq!(
            history.last_error.as_deref(),
            Some("The end date is before the start date")
        );

        history.end_date = "June 1st".to_string();
        assert_eq!(history.begin_refresh(), None);
        assert!(!history.loading);

        history.end_date = "2024-06-30".to_string();
        assert!(history.begin_refresh().is_some());
    }

    #[test]
    fn one_fetch_at_a_time() {
        let mut history = EntryHistory::new();
        assert!(history.begin_refresh().is_some());
        assert_eq!(history.begin_refresh(), None);
        history.settle(Ok(vec![record("a")]));
        assert!(history.begin_refresh().is_some());
    }

    #[test]
    fn failure_keeps_previous_entries() {
        let mut history = EntryHistory::new();
        history.begin_refresh();
        history.settle(Ok(vec![record("a"), record("b")]));

        history.begin_refresh();
        history.settle(Err(JournalError::Status(500)));

        assert!(!history.loading);
        assert_eq!(history.entries.len(), 2);
        assert_eq!(
            history.last_error.as_deref(),
            Some("Couldn't reach the journal service")
        );

        history.begin_refresh();
        history.settle(Ok(Vec::new()));
        assert!(history.last_error.is_none());
        assert!(history.entries.is_empty());
    }

    #[test]
    fn refresh_when_visible_and_stale() {
        let mut history = EntryHistory::new();
        assert!(!history.needs_refresh());

        history.visible = true;
        assert!(history.needs_refresh());

        history.begin_refresh();
        assert!(!history.needs_refresh());
        history.settle(Ok(Vec::new()));
        assert!(!history.needs_refresh());

        history.mark_stale();
        assert!(history.needs_refresh());
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mut history = EntryHistory::new();
        assert_eq!(history.begin_delete(), None);

        history.request_delete("id-a");
        history.cancel_delete();
        assert_eq!(history.begin_delete(), None);

        history.request_delete("id-a");
        assert_eq!(history.begin_delete(), Some("id-a".to_string()));
        assert_eq!(history.confirm_delete, None);
        assert_eq!(history.deleting.as_deref(), Some("id-a"));

        history.request_delete("id-b");
        assert_eq!(history.begin_delete(), None);
    }

    #[test]
    fn successful_delete_drops_the_row_and_marks_stale() {
        let mut history = EntryHistory::new();
        history.begin_refresh();
        history.settle(Ok(vec![record("a"), record("b")]));
        assert!(!history.stale);

        history.request_delete("id-a");
        history.begin_delete();
        history.settle_delete(Ok(()));

        assert_eq!(history.deleting, None);
        assert_eq!(history.entries, vec![record("b")]);
        assert!(history.stale);
        assert!(history.last_error.is_none());
    }

    #[test]
    fn failed_delete_keeps_the_list() {
        let mut history = EntryHistory::new();
        history.begin_refresh();
        history.settle(Ok(vec![record("a"), record("b")]));

        history.request_delete("id-a");
        history.begin_delete();
        history.settle_delete(Err(JournalError::Status(500)));

        assert_eq!(history.deleting, None);
        assert_eq!(history.entries, vec![record("a"), record("b")]);
        assert!(!history.stale);
        assert_eq!(
            history.last_error.as_deref(),
            Some("Couldn't delete the entry. Try again?")
        );
    }
}
