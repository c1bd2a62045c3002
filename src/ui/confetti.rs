use iced::mouse::Cursor;
use iced::widget::canvas::{self, Program};
use iced::{Point, Rectangle, Renderer, Size, Theme, Vector};
use std::time::Instant;

use crate::state::confetti::ConfettiEngine;
use crate::Message;

/// Half the side of a confetti square, in pixels
const HALF_SIZE: f32 = 4.0;

/// Pixels of travel above and below the window edges
const OVERSHOOT: f32 = 100.0;

/// Full-window canvas layer that draws the active confetti batch.
///
/// Each particle falls from above the top edge to below the bottom one
/// with a full double rotation, fading out along the way. Particles
/// whose delay has not elapsed, or whose fall has finished, are skipped.
pub struct ConfettiLayer<'a> {
    pub engine: &'a ConfettiEngine,
    pub now: Instant,
}

impl<'a> Program<Message> for ConfettiLayer<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let Some(elapsed) = self.engine.elapsed(self.now) else {
            return vec![];
        };

        let mut frame = canvas::Frame::new(renderer, bounds.size());

        for piece in self.engine.pieces() {
            let progress = (elapsed - piece.delay) / piece.duration;
            if !(0.0..=1.0).contains(&progress) {
                continue;
            }

            let x = bounds.width * piece.x_percent / 100.0;
            let y = -OVERSHOOT + (bounds.height + 2.0 * OVERSHOOT) * progress;
            let rotation = progress * 2.0 * std::f32::consts::TAU;

            let mut color = piece.color;
            color.a = 1.0 - progress;

            frame.with_save(|frame| {
                frame.translate(Vector::new(x, y));
                frame.rotate(rotation);
                frame.fill_rectangle(
                    Point::new(-HALF_SIZE, -HALF_SIZE),
                    Size::new(2.0 * HALF_SIZE, 2.0 * HALF_SIZE),
                    color,
                );
            });
        }

        vec![frame.into_geometry()]
    }
}
