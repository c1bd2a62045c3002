/// Playback controller
///
/// Platform-agnostic: the core holds the playlist, the
/// {Stopped, Playing, Paused} state, volume and mute, and pulls samples
/// from an [`AudioSource`]. Device code lives in output.rs and only
/// calls [`PlayerCore::mix_into`] from the stream callback.
use std::time::Duration;

use super::synth::{self, Melody, MelodySource};

/// Ambient default volume (30%)
pub const DEFAULT_VOLUME: f32 = 0.3;

const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Anything that can hand the controller mono samples
pub trait AudioSource: Send {
    /// Fill `buffer` from the current position; returns samples written
    fn read_samples(&mut self, buffer: &mut [f32]) -> usize;
    fn seek(&mut self, position: Duration);
    fn position(&self) -> Duration;
    fn duration(&self) -> Duration;
    fn is_finished(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// One entry in the built-in playlist
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
    pub melody: Melody,
}

impl Track {
    pub fn duration(&self) -> Duration {
        self.melody.duration()
    }
}

/// The birthday playlist
pub fn birthday_playlist() -> Vec<Track> {
    vec![
        Track {
            id: "happy-birthday",
            title: "Happy Birthday",
            artist: "Traditional",
            melody: synth::happy_birthday(),
        },
        Track {
            id: "celebration-fanfare",
            title: "Celebration Fanfare",
            artist: "The Card Band",
            melody: synth::celebration_fanfare(),
        },
        Track {
            id: "party-lights",
            title: "Party Lights",
            artist: "The Card Band",
            melody: synth::party_lights(),
        },
        Track {
            id: "make-a-wish",
            title: "Make a Wish",
            artist: "The Card Band",
            melody: synth::make_a_wish(),
        },
    ]
}

/// Owned snapshot of the controller for the view layer
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub current: usize,
    pub title: String,
    pub artist: String,
    pub position: Duration,
    pub duration: Duration,
    pub progress: f32,
    pub volume: f32,
    pub muted: bool,
    pub tracks: Vec<TrackInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    pub duration: Duration,
}

/// The playback state machine
pub struct PlayerCore {
    playlist: Vec<Track>,
    current: usize,
    state: PlaybackState,
    volume: f32,
    muted: bool,
    sample_rate: u32,
    source: Box<dyn AudioSource>,
}

impl PlayerCore {
    /// The playlist must not be empty.
    pub fn new(playlist: Vec<Track>) -> Self {
        assert!(!playlist.is_empty(), "playlist must not be empty");
        let source = Box::new(MelodySource::new(&playlist[0].melody, DEFAULT_SAMPLE_RATE));
        Self {
            playlist,
            current: 0,
            state: PlaybackState::Stopped,
            volume: DEFAULT_VOLUME,
            muted: false,
            sample_rate: DEFAULT_SAMPLE_RATE,
            source,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_track(&self) -> &Track {
        &self.playlist[self.current]
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    /// Start (or resume) playback. A finished track restarts.
    pub fn play(&mut self) {
        if self.source.is_finished() {
            self.rebuild_source();
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Skip forward with wraparound and keep playing
    pub fn next(&mut self) {
        self.go_to((self.current + 1) % self.playlist.len());
        self.state = PlaybackState::Playing;
    }

    /// Skip backward with wraparound and keep playing
    pub fn previous(&mut self) {
        self.go_to((self.current + self.playlist.len() - 1) % self.playlist.len());
        self.state = PlaybackState::Playing;
    }

    /// Jump to a playlist entry. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.playlist.len() {
            self.go_to(index);
            self.state = PlaybackState::Playing;
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute toggling never touches the stored volume
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the output volume, clamped to [0, 1]. Leaves mute alone.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// What actually reaches the speakers
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    /// Seek to a fraction of the current track. A track with unknown
    /// (zero) duration makes this a no-op.
    pub fn seek(&mut self, fraction: f32) {
        let duration = self.source.duration();
        if duration.is_zero() {
            return;
        }
        self.source.seek(duration.mul_f32(fraction.clamp(0.0, 1.0)));
    }

    pub fn position(&self) -> Duration {
        self.source.position()
    }

    pub fn duration(&self) -> Duration {
        self.source.duration()
    }

    /// Progress through the current track in [0, 1]
    pub fn progress(&self) -> f32 {
        let duration = self.source.duration();
        if duration.is_zero() {
            0.0
        } else {
            (self.source.position().as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
        }
    }

    /// Adopt the output device's sample rate, keeping the position
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate == 0 || sample_rate == self.sample_rate {
            return;
        }
        let position = self.source.position();
        self.sample_rate = sample_rate;
        self.rebuild_source();
        self.source.seek(position);
    }

    /// Fill `buffer` with output samples at the effective volume.
    /// Called from the audio stream callback. Natural end of track
    /// advances to the next entry and playback continues.
    pub fn mix_into(&mut self, buffer: &mut [f32]) {
        buffer.fill(0.0);
        if self.state != PlaybackState::Playing {
            return;
        }

        let gain = self.effective_volume();
        let written = self.source.read_samples(buffer);
        for sample in &mut buffer[..written] {
            *sample *= gain;
        }

        if self.source.is_finished() {
            self.go_to((self.current + 1) % self.playlist.len());
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let track = self.current_track();
        PlayerSnapshot {
            state: self.state,
            current: self.current,
            title: track.title.to_owned(),
            artist: track.artist.to_owned(),
            position: self.position(),
            duration: self.duration(),
            progress: self.progress(),
            volume: self.volume,
            muted: self.muted,
            tracks: self
                .playlist
                .iter()
                .map(|t| TrackInfo {
                    title: t.title.to_owned(),
                    artist: t.artist.to_owned(),
                    duration: t.duration(),
                })
                .collect(),
        }
    }

    fn go_to(&mut self, index: usize) {
        self.current = index;
        self.rebuild_source();
    }

    fn rebuild_source(&mut self) {
        self.source = Box::new(MelodySource::new(
            &self.playlist[self.current].melody,
            self.sample_rate,
        ));
    }
}

// The boxed source has no useful Debug representation
impl std::fmt::Debug for PlayerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerCore")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("volume", &self.volume)
            .field("muted", &self.muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_track() -> Track {
        Track {
            id: "silence",
            title: "Silence",
            artist: "Nobody",
            melody: Melody {
                tempo_bpm: 120.0,
                notes: vec![],
            },
        }
    }

    #[test]
    fn test_initial_state() {
        let core = PlayerCore::new(birthday_playlist());
        assert_eq!(core.state(), PlaybackState::Stopped);
        assert_eq!(core.current_index(), 0);
        assert!(!core.is_muted());
        assert_eq!(core.volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn test_play_pause_transitions() {
        let mut core = PlayerCore::new(birthday_playlist());

        // Pause from Stopped is a no-op.
        core.pause();
        assert_eq!(core.state(), PlaybackState::Stopped);

        core.play();
        assert_eq!(core.state(), PlaybackState::Playing);
        core.pause();
        assert_eq!(core.state(), PlaybackState::Paused);
        core.play();
        assert_eq!(core.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_volume_mute_round_trip() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.set_volume(0.8);

        core.toggle_mute();
        assert!(core.is_muted());
        assert_eq!(core.effective_volume(), 0.0);
        assert_eq!(core.volume(), 0.8);

        core.toggle_mute();
        assert!(!core.is_muted());
        assert_eq!(core.effective_volume(), 0.8);
    }

    #[test]
    fn test_set_volume_clamps_and_keeps_mute() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.toggle_mute();

        core.set_volume(2.5);
        assert_eq!(core.volume(), 1.0);
        core.set_volume(-1.0);
        assert_eq!(core.volume(), 0.0);
        assert!(core.is_muted());
    }

    #[test]
    fn test_next_previous_wraparound() {
        let mut core = PlayerCore::new(birthday_playlist());
        let len = core.playlist().len();

        core.previous();
        assert_eq!(core.current_index(), len - 1);
        assert_eq!(core.state(), PlaybackState::Playing);

        core.next();
        assert_eq!(core.current_index(), 0);

        for _ in 0..len {
            core.next();
        }
        assert_eq!(core.current_index(), 0);
    }

    #[test]
    fn test_natural_end_advances_and_keeps_playing() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.play();

        // Drain the first track, then let the mixer notice the end.
        core.seek(1.0);
        let mut buffer = [0.0f32; 64];
        core.mix_into(&mut buffer);

        assert_eq!(core.current_index(), 1);
        assert_eq!(core.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_end_of_last_track_wraps_to_first() {
        let mut core = PlayerCore::new(birthday_playlist());
        let last = core.playlist().len() - 1;
        core.select(last);
        core.seek(1.0);

        let mut buffer = [0.0f32; 64];
        core.mix_into(&mut buffer);

        assert_eq!(core.current_index(), 0);
        assert_eq!(core.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_seek_is_a_no_op_without_duration() {
        let mut core = PlayerCore::new(vec![silent_track()]);
        core.seek(0.5);
        assert_eq!(core.position(), Duration::ZERO);
        assert_eq!(core.progress(), 0.0);
    }

    #[test]
    fn test_seek_clamps_fraction() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.seek(7.0);
        let gap = core.duration().as_secs_f32() - core.position().as_secs_f32();
        assert!(gap.abs() < 0.01);
        core.seek(-3.0);
        assert_eq!(core.position(), Duration::ZERO);
    }

    #[test]
    fn test_mixer_is_silent_unless_playing() {
        let mut core = PlayerCore::new(birthday_playlist());
        let mut buffer = [1.0f32; 32];

        core.mix_into(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));

        core.play();
        core.pause();
        let mut buffer = [1.0f32; 32];
        core.mix_into(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_mixer_produces_audio_while_playing() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.set_volume(1.0);
        core.play();

        let mut buffer = [0.0f32; 4096];
        core.mix_into(&mut buffer);
        assert!(buffer.iter().any(|s| s.abs() > 0.0));
        assert!(buffer.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_muted_mixer_outputs_silence_but_advances() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.play();
        core.toggle_mute();

        let before = core.position();
        let mut buffer = [0.0f32; 512];
        core.mix_into(&mut buffer);

        assert!(buffer.iter().all(|s| *s == 0.0));
        assert!(core.position() > before);
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.select(99);
        assert_eq!(core.current_index(), 0);
        assert_eq!(core.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_snapshot_reflects_the_core() {
        let mut core = PlayerCore::new(birthday_playlist());
        core.set_volume(0.5);
        core.play();

        let snapshot = core.snapshot();
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert_eq!(snapshot.title, "Happy Birthday");
        assert_eq!(snapshot.volume, 0.5);
        assert_eq!(snapshot.tracks.len(), 4);
    }
}
