/// Audio playback module
///
/// Split the way the playback stack is layered:
/// - player.rs: platform-agnostic playback controller (no device code)
/// - synth.rs: built-in melodies rendered as samples
/// - output.rs: the cpal output stream that pulls from the controller

pub mod output;
pub mod player;
pub mod synth;
