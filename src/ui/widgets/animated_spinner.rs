// SPDX-License-Identifier: MPL-2.0
//! Loading spinner drawn on a canvas.
//!
//! The caller owns the rotation angle (advanced by the loading
//! sub-component on every tick); the widget only draws it.

use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke};
use iced::{mouse, Color, Element, Length, Point, Rectangle, Renderer, Theme};
use std::f32::consts::{FRAC_PI_2, PI};

/// Portion of the ring covered by the moving arc, in radians.
const ARC_SWEEP: f32 = PI * 1.5;
const ARC_SEGMENTS: u16 = 36;
const STROKE_WIDTH: f32 = 3.0;

/// Ring with a rotating arc.
#[derive(Debug, Clone, Copy)]
pub struct AnimatedSpinner {
    rotation: f32,
    color: Color,
    size: f32,
}

impl AnimatedSpinner {
    #[must_use]
    pub fn new(color: Color, rotation: f32, size: f32) -> Self {
        Self {
            rotation,
            color,
            size,
        }
    }

    pub fn into_element<'a, Message: 'a>(self) -> Element<'a, Message> {
        let size = self.size;
        Canvas::new(self)
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into()
    }

    /// Start angle of the arc; zero rotation starts at twelve o'clock.
    fn start_angle(&self) -> f32 {
        self.rotation - FRAC_PI_2
    }
}

fn point_on_circle(center: Point, radius: f32, angle: f32) -> Point {
    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

impl<Message> canvas::Program<Message> for AnimatedSpinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();
        let radius = (frame.width().min(frame.height()) / 2.0 - STROKE_WIDTH).max(1.0);

        frame.stroke(
            &Path::circle(center, radius),
            Stroke::default()
                .with_width(STROKE_WIDTH)
                .with_color(Color {
                    a: 0.2,
                    ..self.color
                }),
        );

        let start = self.start_angle();
        let arc = Path::new(|builder| {
            builder.move_to(point_on_circle(center, radius, start));
            for segment in 1..=ARC_SEGMENTS {
                let t = f32::from(segment) / f32::from(ARC_SEGMENTS);
                builder.line_to(point_on_circle(center, radius, start + ARC_SWEEP * t));
            }
        });
        frame.stroke(
            &arc,
            Stroke::default()
                .with_width(STROKE_WIDTH)
                .with_color(self.color)
                .with_line_cap(canvas::LineCap::Round),
        );

        vec![frame.into_geometry()]
    }
}
