/// View composition module
///
/// Pure view builders over the state module:
/// - Confetti canvas layer (confetti.rs)
/// - Gallery grid and modal viewer (gallery.rs)
/// - Floating music player panel (player.rs)
/// - Feedback form and thank-you card (feedback.rs)
/// - Guest book messages page (messages.rs)
/// - Birthday wish cards (wishes.rs)

pub mod confetti;
pub mod feedback;
pub mod gallery;
pub mod messages;
pub mod player;
pub mod wishes;
