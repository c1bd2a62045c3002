/// Confetti batch lifecycle
///
/// The engine owns a fixed-size batch of particles and its own clearing
/// deadline. Re-activating while a batch is falling replaces both the
/// particles and the deadline, so an earlier activation can never clear
/// a later batch.
use iced::Color;
use rand::Rng;
use std::time::{Duration, Instant};

/// Number of particles in a batch
pub const BATCH_SIZE: usize = 50;

/// How long a batch stays on screen before it is cleared
pub const CLEAR_AFTER: Duration = Duration::from_millis(5000);

/// Festive palette: hot pink, gold, medium purple, deep pink, orchid
pub const PALETTE: [Color; 5] = [
    Color { r: 1.0, g: 0.412, b: 0.706, a: 1.0 },
    Color { r: 1.0, g: 0.843, b: 0.0, a: 1.0 },
    Color { r: 0.576, g: 0.439, b: 0.859, a: 1.0 },
    Color { r: 1.0, g: 0.078, b: 0.576, a: 1.0 },
    Color { r: 0.855, g: 0.439, b: 0.839, a: 1.0 },
];

/// A single falling particle with its randomized visual parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiPiece {
    /// Stable identity within the engine, used as a render key
    pub id: u32,
    pub color: Color,
    /// Horizontal start position as a percentage of the window width
    pub x_percent: f32,
    /// Seconds after activation before this piece starts falling
    pub delay: f32,
    /// Seconds the fall takes once started
    pub duration: f32,
}

/// Generates and clears confetti batches.
///
/// The particle count is always exactly 0 or exactly [`BATCH_SIZE`].
#[derive(Debug, Default)]
pub struct ConfettiEngine {
    pieces: Vec<ConfettiPiece>,
    activated_at: Option<Instant>,
    clear_at: Option<Instant>,
    next_id: u32,
}

impl ConfettiEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a fresh batch and schedule it to clear [`CLEAR_AFTER`]
    /// from `now`. Supersedes any batch still on screen.
    pub fn activate(&mut self, now: Instant) {
        let mut rng = rand::rng();

        self.pieces.clear();
        for _ in 0..BATCH_SIZE {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);

            self.pieces.push(ConfettiPiece {
                id,
                color: PALETTE[rng.random_range(0..PALETTE.len())],
                x_percent: rng.random_range(0.0..100.0),
                delay: rng.random_range(0.0..3.0),
                duration: rng.random_range(2.0..4.0),
            });
        }

        self.activated_at = Some(now);
        self.clear_at = Some(now + CLEAR_AFTER);
    }

    /// Drive the clearing deadline. Returns true if the batch was
    /// cleared on this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.clear_at {
            Some(deadline) if now >= deadline => {
                self.pieces.clear();
                self.activated_at = None;
                self.clear_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.pieces.is_empty()
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    /// Seconds since the current batch was activated, if one is active
    pub fn elapsed(&self, now: Instant) -> Option<f32> {
        self.activated_at
            .map(|start| now.saturating_duration_since(start).as_secs_f32())
    }
}
