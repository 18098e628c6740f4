//! Uploader state.
//!
//! [`UploaderState`] is a plain value driven by two inputs: a new selection
//! ([`UploaderState::begin_batch`]) and events reported by upload tasks
//! ([`UploaderState::apply`]). It never touches the DOM or timers; delayed
//! effects are returned as [`Followup`]s for the view to schedule.

use crate::config::Config;
use crate::types::{
    EntryId, FileEntry, FileSource, Progress, StatusKind, StatusMessage, UploadEvent,
    UploadOutcome,
};

/// Highest percentage the simulated progress reaches before completion.
pub const SIMULATED_PROGRESS_CAP: f64 = 95.0;

/// Info message shown when a selection is accepted.
pub const PREPARING_MESSAGE: &str = "Preparing files for upload...";

/// Delayed effect requested by the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Followup {
    /// Clear the status banner if it still shows message `seq`.
    ClearStatus { seq: u64, after_ms: u32 },
    /// Hide the progress indicator.
    HideProgress { after_ms: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploaderState {
    entries: Vec<FileEntry>,
    status: Option<StatusMessage>,
    progress: Progress,
    next_seq: u64,
    success_message_ms: u32,
    progress_hide_ms: u32,
}

impl UploaderState {
    pub fn new(config: &Config) -> Self {
        Self {
            entries: Vec::new(),
            status: None,
            progress: Progress::default(),
            next_seq: 0,
            success_message_ms: config.success_message_ms,
            progress_hide_ms: config.progress_hide_ms,
        }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &EntryId) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Whether any upload is in flight.
    pub fn is_busy(&self) -> bool {
        self.progress.in_flight > 0
    }

    /// Replace the file list with one `Uploading` row per file.
    ///
    /// Returns the new row ids in selection order, or `None` (and changes
    /// nothing) for an empty selection.
    pub fn begin_batch<F: FileSource>(&mut self, files: &[F]) -> Option<Vec<EntryId>> {
        if files.is_empty() {
            return None;
        }

        self.show_status(PREPARING_MESSAGE.to_string(), StatusKind::Info);
        self.entries = files.iter().map(FileEntry::new).collect();

        Some(self.entries.iter().map(|entry| entry.id.clone()).collect())
    }

    /// Apply an event reported by an upload task.
    ///
    /// Events for rows no longer displayed still update the shared status
    /// banner and progress indicator.
    pub fn apply(&mut self, event: UploadEvent) -> Vec<Followup> {
        match event {
            UploadEvent::Started { .. } => {
                self.progress.visible = true;
                self.progress.percent = 0.0;
                self.progress.in_flight += 1;
                Vec::new()
            }
            UploadEvent::Settled {
                id,
                file_name,
                outcome,
            } => {
                if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
                    if !entry.status.settle(&outcome) {
                        log::warn!("Ignoring second settlement of {}", id);
                    }
                }

                self.progress.in_flight = self.progress.in_flight.saturating_sub(1);
                if self.progress.in_flight == 0 {
                    self.progress.percent = 100.0;
                }

                let mut followups = vec![Followup::HideProgress {
                    after_ms: self.progress_hide_ms,
                }];

                match outcome {
                    UploadOutcome::Uploaded => {
                        let seq = self.show_status(
                            format!("File \"{}\" uploaded successfully!", file_name),
                            StatusKind::Success,
                        );
                        followups.push(Followup::ClearStatus {
                            seq,
                            after_ms: self.success_message_ms,
                        });
                    }
                    UploadOutcome::Failed(reason) => {
                        self.show_status(
                            format!("Failed to upload \"{}\": {}", file_name, reason),
                            StatusKind::Error,
                        );
                    }
                }

                followups
            }
        }
    }

    /// Clear the status banner if it still shows message `seq`.
    pub fn clear_status(&mut self, seq: u64) {
        if self.status.as_ref().is_some_and(|status| status.seq == seq) {
            self.status = None;
        }
    }

    pub fn hide_progress(&mut self) {
        self.progress.visible = false;
    }

    /// Advance the simulated progress by `step` percent.
    ///
    /// Only moves while an upload is in flight, and never past
    /// [`SIMULATED_PROGRESS_CAP`].
    pub fn tick_progress(&mut self, step: f64) {
        if !self.is_busy() || !self.progress.visible {
            return;
        }
        self.progress.percent = (self.progress.percent + step).min(SIMULATED_PROGRESS_CAP);
    }

    fn show_status(&mut self, text: String, kind: StatusKind) -> u64 {
        self.next_seq += 1;
        self.status = Some(StatusMessage {
            text,
            kind,
            seq: self.next_seq,
        });
        self.next_seq
    }
}
