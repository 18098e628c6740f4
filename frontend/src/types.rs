//! Common types used across the uploader.
//!
//! # Categories
//!
//! - **File Types** - the selected file abstraction and list rows
//! - **Status Types** - upload state machine and the status banner
//! - **Event Types** - messages sent by upload tasks
//! - **Error Types** - upload failures

use rand::RngCore;
use std::fmt;
use thiserror::Error;

use crate::format::{file_extension, format_file_size};

// =============================================================================
// File Types
// =============================================================================

/// A file picked by the user.
///
/// Implemented by `web_sys::File` in the browser and by in-memory fakes in
/// tests.
pub trait FileSource {
    /// Original file name.
    fn file_name(&self) -> String;
    /// Size in bytes.
    fn byte_len(&self) -> u64;
}

impl FileSource for web_sys::File {
    fn file_name(&self) -> String {
        self.name()
    }

    fn byte_len(&self) -> u64 {
        self.size() as u64
    }
}

/// Opaque identifier of a file list row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    /// New id of the form `file-<unix millis>-<10 hex chars>`.
    pub fn generate() -> Self {
        let mut suffix = [0u8; 5];
        rand::thread_rng().fill_bytes(&mut suffix);
        Self(format!(
            "file-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            hex::encode(suffix)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the file list.
#[derive(Clone, Debug, PartialEq)]
pub struct FileEntry {
    pub id: EntryId,
    /// File name as selected
    pub display_name: String,
    /// Human readable size ("2 KB")
    pub display_size: String,
    /// Upper-cased extension, used as the row icon
    pub extension: String,
    pub status: UploadStatus,
}

impl FileEntry {
    /// Fresh row in the `Uploading` state.
    pub fn new<F: FileSource + ?Sized>(file: &F) -> Self {
        let name = file.file_name();
        Self {
            id: EntryId::generate(),
            extension: file_extension(&name),
            display_size: format_file_size(file.byte_len()),
            display_name: name,
            status: UploadStatus::Uploading,
        }
    }
}

// =============================================================================
// Status Types
// =============================================================================

/// Upload state of a single row.
///
/// `Uploading` is the only non-terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadStatus {
    Uploading,
    Uploaded,
    Error,
}

impl UploadStatus {
    /// Move to the terminal state matching `outcome`.
    ///
    /// Returns `false` and leaves the state untouched when already terminal.
    pub fn settle(&mut self, outcome: &UploadOutcome) -> bool {
        if *self != UploadStatus::Uploading {
            return false;
        }
        *self = match outcome {
            UploadOutcome::Uploaded => UploadStatus::Uploaded,
            UploadOutcome::Failed(_) => UploadStatus::Error,
        };
        true
    }

    pub fn is_terminal(&self) -> bool {
        *self != UploadStatus::Uploading
    }

    /// Label shown in the row.
    pub fn label(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "Uploading...",
            UploadStatus::Uploaded => "Uploaded",
            UploadStatus::Error => "Error",
        }
    }

    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "status-uploading",
            UploadStatus::Uploaded => "status-uploaded",
            UploadStatus::Error => "status-error",
        }
    }
}

/// Severity of the status banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// The single status banner.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    /// Sequence number, used to match delayed clears with their message
    pub seq: u64,
}

/// Shared progress indicator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Progress {
    pub visible: bool,
    /// Percentage in `0.0..=100.0`
    pub percent: f64,
    /// Uploads started and not yet settled
    pub in_flight: usize,
}

impl Progress {
    /// Text shown under the bar.
    pub fn label(&self) -> String {
        format!("Uploading... {}%", self.percent.round() as u32)
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// Result of one upload request.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    Uploaded,
    /// Human readable failure reason
    Failed(String),
}

/// Message sent by an upload task to the view.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    /// Request about to be sent.
    Started { id: EntryId },
    /// Request settled, successfully or not.
    Settled {
        id: EntryId,
        file_name: String,
        outcome: UploadOutcome,
    },
}

// =============================================================================
// Error Types
// =============================================================================

/// Upload failures.
///
/// The widget handles every variant the same way: the row goes to
/// `Error` and the `Display` output becomes the reason shown to the user.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AppError {
    /// Backend answered with a non-success status.
    #[error("Upload failed: {}", status_reason(.status, .status_text))]
    Server { status: u16, status_text: String },

    /// Network or CORS failure.
    #[error("{0}")]
    Network(String),

    /// Success status but the body is not JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request body could not be built.
    #[error("Failed to build request: {0}")]
    Request(String),
}

fn status_reason(status: &u16, status_text: &str) -> String {
    if status_text.is_empty() {
        format!("HTTP {}", status)
    } else {
        status_text.to_string()
    }
}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
