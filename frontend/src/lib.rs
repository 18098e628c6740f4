//! Cloud Storage - Frontend Rust/Leptos Application
//!
//! A WebAssembly drag-and-drop uploader. Every selected file is sent to
//! `{backend}/upload` as its own multipart request and gets its own row in
//! the file list.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Hero (title, description)                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Uploader                                                    │
//! │  ├── UploadSection (drop zone, picker)                      │
//! │  ├── ProgressSection                                        │
//! │  ├── StatusBanner                                           │
//! │  └── UploadList                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//!
//!   selection ──► UploaderState::begin_batch ──► UploadDispatcher
//!                                                   │ (one task per file)
//!   UploaderState::apply ◄──── UploadEvent ◄────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Backend URL and timings
//! - [`types`] - Common types (FileEntry, UploadStatus, AppError, etc.)
//! - [`format`] - File size and extension formatting
//! - [`state`] - Uploader state transitions
//! - [`components`] - UI components
//! - [`services`] - Backend communication

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod format;
pub mod state;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    EntryId, FileEntry, FileSource,
    // Status
    Progress, StatusKind, StatusMessage, UploadStatus,
    // Events
    UploadEvent, UploadOutcome,
    // Errors
    AppError, AppResult,
};

// Formatting
pub use format::{file_extension, format_file_size};

// State
pub use state::{Followup, UploaderState};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App(config: Config) -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Cloud Storage"/>
        <Router>
            <main>
                <Routes>
                    <Route
                        path="/"
                        view=move || view! { <MainContent config=config.clone()/> }
                    />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent(config: Config) -> impl IntoView {
    view! {
        <div class="container">
            <Hero/>
            <Uploader config=config/>
        </div>

        <Footer/>
    }
}
