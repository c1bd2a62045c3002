/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the guest book database, the gallery, and the UI layer.
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// A single photo in the gallery
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    /// Full path to the image file
    pub path: PathBuf,
    /// Accessible description of the photo
    pub alt: String,
    /// Caption shown under the photo in the modal viewer
    pub caption: String,
}

/// A guest book message as stored in the database
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackMessage {
    /// Unique database ID, assigned by the store
    pub id: i64,
    /// The message text (never empty)
    pub message: String,
    /// When the message was saved, assigned by the store
    pub created_at: DateTime<Utc>,
}
