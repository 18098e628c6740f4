//! UI Components for the Cloud Storage uploader.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`Uploader`] - The widget; owns state and dispatches uploads
//! - [`UploadSection`] - Drop zone and file picker
//! - [`ProgressSection`] - Shared progress indicator
//! - [`StatusBanner`] - Single status message
//! - [`UploadList`] - One row per selected file

mod hero;
mod uploader;
mod upload;
mod progress;
mod status;
mod file_list;
mod footer;

pub use hero::*;
pub use uploader::*;
pub use upload::*;
pub use progress::*;
pub use status::*;
pub use file_list::*;
pub use footer::*;
