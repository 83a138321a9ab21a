use std::mem;
use tracing::{debug, info, warn};

use super::error::JournalError;
use super::models::{Analysis, SaveOutcome};
use super::service::JournalService;
use crate::notify::{Notification, Notifier};

/// Whether a save is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Saving,
}

/// Everything the journal page shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalState {
    /// Unsaved text in the journal box
    pub draft: String,
    pub submission: SubmissionState,
    /// Last analysis from a fully successful save
    pub analysis: Option<Analysis>,
    /// Text of the last stored entry, as the service returned it
    pub saved_entry: Option<String>,
    /// Whether the entry dialog is open
    pub popup_visible: bool,
    /// Content captured when the current save began
    pub in_flight: Option<String>,
}

impl JournalState {
    pub fn draft_is_blank(&self) -> bool {
        self.draft.trim().is_empty()
    }

    /// The Save control is live only when idle with something to save
    pub fn can_submit(&self) -> bool {
        self.submission == SubmissionState::Idle && !self.draft_is_blank()
    }
}

/// Inputs to the journal page state machine
#[derive(Debug)]
pub enum JournalEvent {
    DraftEdited(String),
    /// Carries the draft text captured for the request
    SubmitStarted(String),
    SaveSettled(Result<SaveOutcome, JournalError>),
    AnalysisOpened,
    AnalysisClosed,
}

/// Pure transition function for the journal page.
///
/// Returns the next state and the notification to show, if any. A
/// `SaveSettled` event always lands in `Idle` and always produces exactly one
/// notification, unless no save was in flight, in which case it is dropped.
pub fn reduce(mut state: JournalState, event: JournalEvent) -> (JournalState, Option<Notification>) {
    match event {
        JournalEvent::DraftEdited(text) => {
            state.draft = text;
            (state, None)
        }
        JournalEvent::SubmitStarted(content) => {
            if state.can_submit() {
                state.submission = SubmissionState::Saving;
                state.in_flight = Some(content);
            }
            (state, None)
        }
        JournalEvent::SaveSettled(result) => {
            if state.submission != SubmissionState::Saving {
                warn!("Dropping save result with no save in flight");
                return (state, None);
            }
            state.submission = SubmissionState::Idle;
            state.in_flight = None;

            let notification = match result {
                Ok(SaveOutcome::Success { entry, analysis }) => {
                    state.analysis = Some(analysis);
                    state.saved_entry = Some(entry);
                    state.draft.clear();
                    Notification::saved()
                }
                Ok(SaveOutcome::PartialSuccess { entry }) => {
                    state.saved_entry = Some(entry);
                    state.draft.clear();
                    Notification::partially_saved()
                }
                Ok(SaveOutcome::Unrecognized(status)) => {
                    save_failed(JournalError::Unrecognized(status))
                }
                Err(e) => save_failed(e),
            };
            (state, Some(notification))
        }
        JournalEvent::AnalysisOpened => {
            state.popup_visible = true;
            (state, None)
        }
        JournalEvent::AnalysisClosed => {
            state.popup_visible = false;
            (state, None)
        }
    }
}

fn save_failed(error: JournalError) -> Notification {
    if error.is_transport() {
        warn!("Save failed: {}", error);
    } else {
        warn!("Save response unusable: {}", error);
    }
    Notification::save_failed()
}

/// A save that has been started and is waiting for the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Draft text captured when the save began
    pub content: String,
}

/// Owns the journal page state and drives saves through the reducer
#[derive(Debug, Default)]
pub struct JournalSubmissionController {
    state: JournalState,
}

impl JournalSubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    /// Direct access for text widgets that edit in place
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.state.draft
    }

    pub fn is_saving(&self) -> bool {
        self.state.submission == SubmissionState::Saving
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    fn apply(&mut self, event: JournalEvent) -> Option<Notification> {
        let (next, notification) = reduce(mem::take(&mut self.state), event);
        self.state = next;
        notification
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.apply(JournalEvent::DraftEdited(text.into()));
    }

    pub fn open_analysis(&mut self) {
        self.apply(JournalEvent::AnalysisOpened);
    }

    pub fn close_analysis(&mut self) {
        self.apply(JournalEvent::AnalysisClosed);
    }

    /// Start a save if the draft has content and nothing is in flight.
    ///
    /// On `Some`, the state is already `Saving` and the caller owns sending
    /// exactly one request with the returned content, then calling `settle`.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if !self.can_submit() {
            debug!(
                "Submit ignored (saving: {}, blank: {})",
                self.is_saving(),
                self.state.draft_is_blank()
            );
            return None;
        }

        self.apply(JournalEvent::SubmitStarted(self.state.draft.clone()));
        let content = self.state.in_flight.clone()?;
        info!("Saving journal entry: {} chars", content.len());
        Some(PendingSubmission { content })
    }

    /// Feed the result of the request back in. Always leaves the state `Idle`.
    pub fn settle(
        &mut self,
        result: Result<SaveOutcome, JournalError>,
        notifier: &mut dyn Notifier,
    ) {
        if let Some(notification) = self.apply(JournalEvent::SaveSettled(result)) {
            notifier.notify(notification);
        }
    }

    /// Run one whole save against `service`. Returns whether a request was sent.
    pub async fn submit(
        &mut self,
        service: &dyn JournalService,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };

        let result = service.save_entry(&pending.content).await;
        self.settle(result, notifier);
        true
    }
}
