//! Backend services.
//!
//! # Services
//!
//! - [`upload`] - multipart upload of selected files, one task per file

pub mod upload;

pub use upload::*;
