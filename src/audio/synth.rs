/// Built-in melody synthesis
///
/// The playlist ships no media files: each track is a note sequence
/// rendered on the fly as enveloped sine waves. The renderer implements
/// [`AudioSource`](super::player::AudioSource) so the playback
/// controller never knows samples come from a synthesizer.
use std::time::Duration;

use super::player::AudioSource;

/// Peak amplitude before the volume stage is applied
const PEAK: f32 = 0.25;

/// Attack ramp at the start of each note, in seconds
const ATTACK: f32 = 0.01;

/// Fraction of each note spent fading out
const RELEASE_FRACTION: f32 = 0.15;

/// A single step in a melody: a pitch (or a rest) held for some beats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// Semitones relative to A440; None is a rest
    pub semitone: Option<i32>,
    /// Length in beats
    pub beats: f32,
}

impl Note {
    pub const fn tone(semitone: i32, beats: f32) -> Self {
        Self {
            semitone: Some(semitone),
            beats,
        }
    }

    pub const fn rest(beats: f32) -> Self {
        Self {
            semitone: None,
            beats,
        }
    }
}

/// An immutable note sequence with a tempo
#[derive(Debug, Clone, PartialEq)]
pub struct Melody {
    pub tempo_bpm: f32,
    pub notes: Vec<Note>,
}

impl Melody {
    pub fn duration(&self) -> Duration {
        let beats: f32 = self.notes.iter().map(|n| n.beats).sum();
        Duration::from_secs_f32(beats * self.seconds_per_beat())
    }

    fn seconds_per_beat(&self) -> f32 {
        60.0 / self.tempo_bpm
    }
}

/// Equal-temperament frequency for a semitone offset from A440
pub fn frequency(semitone: i32) -> f32 {
    440.0 * 2f32.powf(semitone as f32 / 12.0)
}

/// One note flattened onto the time axis
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: f32,
    end: f32,
    frequency: Option<f32>,
}

/// Renders a [`Melody`] as mono samples
pub struct MelodySource {
    segments: Vec<Segment>,
    total_seconds: f32,
    sample_rate: u32,
    frame: u64,
    total_frames: u64,
    cursor: usize,
}

impl MelodySource {
    pub fn new(melody: &Melody, sample_rate: u32) -> Self {
        let spb = melody.seconds_per_beat();
        let mut segments = Vec::with_capacity(melody.notes.len());
        let mut clock = 0.0f32;

        for note in &melody.notes {
            let end = clock + note.beats * spb;
            segments.push(Segment {
                start: clock,
                end,
                frequency: note.semitone.map(frequency),
            });
            clock = end;
        }

        Self {
            segments,
            total_seconds: clock,
            sample_rate,
            frame: 0,
            total_frames: (clock * sample_rate as f32) as u64,
            cursor: 0,
        }
    }

    fn sample_at(&mut self, t: f32) -> f32 {
        while self.cursor < self.segments.len() && t >= self.segments[self.cursor].end {
            self.cursor += 1;
        }
        let Some(segment) = self.segments.get(self.cursor) else {
            return 0.0;
        };
        let Some(freq) = segment.frequency else {
            return 0.0;
        };

        let local = t - segment.start;
        let length = segment.end - segment.start;

        let attack = (local / ATTACK).min(1.0);
        let release_start = length * (1.0 - RELEASE_FRACTION);
        let release = if local > release_start {
            ((length - local) / (length - release_start)).max(0.0)
        } else {
            1.0
        };

        (std::f32::consts::TAU * freq * local).sin() * PEAK * attack * release
    }
}

impl AudioSource for MelodySource {
    fn read_samples(&mut self, buffer: &mut [f32]) -> usize {
        let mut written = 0;
        for slot in buffer.iter_mut() {
            if self.frame >= self.total_frames {
                break;
            }
            let t = self.frame as f32 / self.sample_rate as f32;
            *slot = self.sample_at(t);
            self.frame += 1;
            written += 1;
        }
        written
    }

    fn seek(&mut self, position: Duration) {
        let frame = (position.as_secs_f32() * self.sample_rate as f32) as u64;
        self.frame = frame.min(self.total_frames);

        // Reposition the segment cursor for the new time
        let t = self.frame as f32 / self.sample_rate as f32;
        self.cursor = self
            .segments
            .iter()
            .position(|s| t < s.end)
            .unwrap_or(self.segments.len());
    }

    fn position(&self) -> Duration {
        Duration::from_secs_f32(self.frame as f32 / self.sample_rate as f32)
    }

    fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.total_seconds)
    }

    fn is_finished(&self) -> bool {
        self.frame >= self.total_frames
    }
}

/// "Happy Birthday", in C, 3/4 time
pub fn happy_birthday() -> Melody {
    // Semitones relative to A440: G4 = -2, A4 = 0, B4 = 2, C5 = 3,
    // D5 = 5, E5 = 7, F5 = 8, G5 = 10.
    let (g4, a4, b4, c5, d5, e5, f5, g5) = (-2, 0, 2, 3, 5, 7, 8, 10);
    Melody {
        tempo_bpm: 120.0,
        notes: vec![
            Note::tone(g4, 0.75),
            Note::tone(g4, 0.25),
            Note::tone(a4, 1.0),
            Note::tone(g4, 1.0),
            Note::tone(c5, 1.0),
            Note::tone(b4, 2.0),
            Note::tone(g4, 0.75),
            Note::tone(g4, 0.25),
            Note::tone(a4, 1.0),
            Note::tone(g4, 1.0),
            Note::tone(d5, 1.0),
            Note::tone(c5, 2.0),
            Note::tone(g4, 0.75),
            Note::tone(g4, 0.25),
            Note::tone(g5, 1.0),
            Note::tone(e5, 1.0),
            Note::tone(c5, 1.0),
            Note::tone(b4, 1.0),
            Note::tone(a4, 2.0),
            Note::tone(f5, 0.75),
            Note::tone(f5, 0.25),
            Note::tone(e5, 1.0),
            Note::tone(c5, 1.0),
            Note::tone(d5, 1.0),
            Note::tone(c5, 2.0),
            Note::rest(1.0),
        ],
    }
}

/// Bright major arpeggio fanfare
pub fn celebration_fanfare() -> Melody {
    let (c4, e4, g4, c5, d5, e5, g5) = (-9, -5, -2, 3, 5, 7, 10);
    Melody {
        tempo_bpm: 140.0,
        notes: vec![
            Note::tone(c4, 0.5),
            Note::tone(e4, 0.5),
            Note::tone(g4, 0.5),
            Note::tone(c5, 0.5),
            Note::tone(e5, 0.5),
            Note::tone(g5, 1.0),
            Note::rest(0.5),
            Note::tone(g5, 0.5),
            Note::tone(e5, 0.5),
            Note::tone(c5, 0.5),
            Note::tone(g4, 0.5),
            Note::tone(c5, 1.5),
            Note::rest(0.5),
            Note::tone(c5, 0.5),
            Note::tone(d5, 0.5),
            Note::tone(e5, 0.5),
            Note::tone(g5, 2.0),
            Note::rest(1.0),
        ],
    }
}

/// Sparkling descending pattern
pub fn party_lights() -> Melody {
    let (a4, c5, e5, a5, g5, f5, d5) = (0, 3, 7, 12, 10, 8, 5);
    Melody {
        tempo_bpm: 128.0,
        notes: vec![
            Note::tone(a5, 0.5),
            Note::tone(g5, 0.5),
            Note::tone(e5, 0.5),
            Note::tone(c5, 0.5),
            Note::tone(a4, 1.0),
            Note::rest(0.5),
            Note::tone(c5, 0.5),
            Note::tone(d5, 0.5),
            Note::tone(e5, 0.5),
            Note::tone(f5, 0.5),
            Note::tone(g5, 0.5),
            Note::tone(a5, 1.5),
            Note::rest(1.0),
        ],
    }
}

/// Gentle closing lullaby
pub fn make_a_wish() -> Melody {
    let (g4, a4, b4, c5, d5, e5) = (-2, 0, 2, 3, 5, 7);
    Melody {
        tempo_bpm: 90.0,
        notes: vec![
            Note::tone(e5, 1.0),
            Note::tone(d5, 1.0),
            Note::tone(c5, 1.0),
            Note::tone(b4, 1.0),
            Note::tone(a4, 1.0),
            Note::tone(g4, 2.0),
            Note::rest(0.5),
            Note::tone(a4, 1.0),
            Note::tone(b4, 1.0),
            Note::tone(c5, 3.0),
            Note::rest(1.0),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_doubles_per_octave() {
        assert!((frequency(0) - 440.0).abs() < 0.001);
        assert!((frequency(12) - 880.0).abs() < 0.01);
        assert!((frequency(-12) - 220.0).abs() < 0.01);
    }

    #[test]
    fn test_melody_duration_follows_tempo() {
        let melody = Melody {
            tempo_bpm: 120.0,
            notes: vec![Note::tone(0, 1.0), Note::rest(1.0), Note::tone(3, 2.0)],
        };
        // Four beats at 120 bpm = two seconds.
        assert_eq!(melody.duration(), Duration::from_secs_f32(2.0));
    }

    #[test]
    fn test_source_renders_bounded_samples() {
        let mut source = MelodySource::new(&happy_birthday(), 44_100);
        let mut buffer = vec![0.0f32; 4096];
        let written = source.read_samples(&mut buffer);

        assert_eq!(written, 4096);
        assert!(buffer.iter().any(|s| s.abs() > 0.0));
        assert!(buffer.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_source_finishes_at_duration() {
        let melody = Melody {
            tempo_bpm: 120.0,
            notes: vec![Note::tone(0, 1.0)],
        };
        // One beat = half a second = 400 frames at 800 Hz.
        let mut source = MelodySource::new(&melody, 800);
        let mut buffer = vec![0.0f32; 1024];

        let written = source.read_samples(&mut buffer);
        assert_eq!(written, 400);
        assert!(source.is_finished());
        assert_eq!(source.read_samples(&mut buffer), 0);
    }

    #[test]
    fn test_seek_moves_and_clamps() {
        let mut source = MelodySource::new(&happy_birthday(), 44_100);
        let duration = source.duration();

        source.seek(duration / 2);
        assert!((source.position().as_secs_f32() - duration.as_secs_f32() / 2.0).abs() < 0.01);
        assert!(!source.is_finished());

        source.seek(duration + Duration::from_secs(10));
        assert!(source.is_finished());
    }

    #[test]
    fn test_empty_melody_has_zero_duration() {
        let melody = Melody {
            tempo_bpm: 120.0,
            notes: vec![],
        };
        let mut source = MelodySource::new(&melody, 44_100);
        assert_eq!(source.duration(), Duration::ZERO);
        assert!(source.is_finished());
        assert_eq!(source.read_samples(&mut [0.0; 16]), 0);
    }
}
