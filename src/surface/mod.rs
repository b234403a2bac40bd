//! Drawing capability consumed by effect renderers.
//!
//! Effects only ever talk to [`RenderSurface`]; the terminal and recording
//! back-ends are interchangeable behind it.

use crate::color::Rgb;
use crate::error::EngineError;
use crate::geometry::{Bounds, Point};

pub mod recording;
pub mod terminal;

pub use recording::{DrawCall, RecordingSurface};
pub use terminal::TerminalSurface;

/// A translucent ribbon spanning the full surface width.
///
/// `crest` holds the ribbon's center line sampled left to right; color fades
/// from `inner` at the crest to `outer` at `thickness` away from it.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientBand {
    pub crest: Vec<Point>,
    pub thickness: f32,
    pub inner: Rgb,
    pub outer: Rgb,
    pub opacity: f32,
}

impl GradientBand {
    /// Crest height at `x`, linearly interpolated between samples.
    pub fn crest_at(&self, x: f32) -> Option<f32> {
        let first = self.crest.first()?;
        if x <= first.x {
            return Some(first.y);
        }
        for pair in self.crest.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.x {
                let span = (b.x - a.x).max(f32::EPSILON);
                return Some(a.y + (b.y - a.y) * (x - a.x) / span);
            }
        }
        self.crest.last().map(|p| p.y)
    }
}

pub trait RenderSurface {
    fn size(&self) -> Bounds;

    /// Adopts new bounds. Called by the driver between ticks only.
    fn resize(&mut self, bounds: Bounds);

    fn clear(&mut self);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb);

    fn fill_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32, rotation: f32, color: Rgb);

    fn fill_polygon(&mut self, points: &[Point], color: Rgb);

    fn fill_star(&mut self, center: Point, tips: usize, outer: f32, inner: f32, rotation: f32, color: Rgb) {
        let points = star_points(center, tips, outer, inner, rotation);
        self.fill_polygon(&points, color);
    }

    fn stroke(&mut self, from: Point, to: Point, width: f32, color: Rgb);

    fn fill_linear_gradient(&mut self, band: &GradientBand);

    /// Runs `body` with every draw call's opacity multiplied by `opacity`.
    fn with_opacity(&mut self, opacity: f32, body: &mut dyn FnMut(&mut dyn RenderSurface));

    /// Runs `body` with a soft halo of `color` and `radius` around each shape.
    fn with_glow(&mut self, color: Rgb, radius: f32, body: &mut dyn FnMut(&mut dyn RenderSurface));

    /// Pushes the finished frame to the back-end's output.
    fn present(&mut self) -> Result<(), EngineError>;
}

/// Outline of a star with `tips` points, alternating outer and inner radius.
pub fn star_points(center: Point, tips: usize, outer: f32, inner: f32, rotation: f32) -> Vec<Point> {
    let tips = tips.max(2);
    let step = std::f32::consts::PI / tips as f32;
    (0..tips * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = rotation - std::f32::consts::FRAC_PI_2 + i as f32 * step;
            Point::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
        })
        .collect()
}
