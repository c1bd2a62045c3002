/// State management module
///
/// This module handles all application state, including:
/// - Guest book database and queries (guestbook.rs)
/// - Shared data structures (data.rs)
/// - Confetti batch lifecycle (confetti.rs)
/// - Photo modal navigation (gallery.rs)
/// - Feedback submission lifecycle (feedback.rs)
/// - Photo scanning and the gallery manifest (photos.rs)

pub mod confetti;
pub mod data;
pub mod feedback;
pub mod gallery;
pub mod guestbook;
pub mod photos;
