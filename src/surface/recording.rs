use super::{GradientBand, RenderSurface};
use crate::color::Rgb;
use crate::error::EngineError;
use crate::geometry::{Bounds, Point};

/// One recorded primitive, with the opacity in effect when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Circle { center: Point, radius: f32, color: Rgb, opacity: f32 },
    Ellipse { center: Point, radius_x: f32, radius_y: f32, rotation: f32, color: Rgb, opacity: f32 },
    Polygon { points: Vec<Point>, color: Rgb, opacity: f32 },
    Stroke { from: Point, to: Point, width: f32, color: Rgb, opacity: f32 },
    Gradient { band: GradientBand, opacity: f32 },
    Glow { color: Rgb, radius: f32 },
    Present,
}

impl DrawCall {
    /// True for calls that put pixels on the surface.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, DrawCall::Clear | DrawCall::Glow { .. } | DrawCall::Present)
    }
}

/// Headless back-end that keeps a log of every draw call.
#[derive(Debug)]
pub struct RecordingSurface {
    bounds: Bounds,
    opacity: f32,
    calls: Vec<DrawCall>,
    fail_present: bool,
}

impl RecordingSurface {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            opacity: 1.0,
            calls: Vec::new(),
            fail_present: false,
        }
    }

    /// Makes every subsequent `present` fail, simulating a lost output.
    pub fn failing(mut self) -> Self {
        self.fail_present = true;
        self
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn primitive_count(&self) -> usize {
        self.calls.iter().filter(|call| call.is_primitive()).count()
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Bounds {
        self.bounds
    }

    fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb) {
        let opacity = self.opacity;
        self.calls.push(DrawCall::Circle { center, radius, color, opacity });
    }

    fn fill_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32, rotation: f32, color: Rgb) {
        let opacity = self.opacity;
        self.calls.push(DrawCall::Ellipse { center, radius_x, radius_y, rotation, color, opacity });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        let opacity = self.opacity;
        self.calls.push(DrawCall::Polygon { points: points.to_vec(), color, opacity });
    }

    fn stroke(&mut self, from: Point, to: Point, width: f32, color: Rgb) {
        let opacity = self.opacity;
        self.calls.push(DrawCall::Stroke { from, to, width, color, opacity });
    }

    fn fill_linear_gradient(&mut self, band: &GradientBand) {
        let opacity = self.opacity;
        self.calls.push(DrawCall::Gradient { band: band.clone(), opacity });
    }

    fn with_opacity(&mut self, opacity: f32, body: &mut dyn FnMut(&mut dyn RenderSurface)) {
        let saved = self.opacity;
        self.opacity = saved * opacity.clamp(0.0, 1.0);
        body(self);
        self.opacity = saved;
    }

    fn with_glow(&mut self, color: Rgb, radius: f32, body: &mut dyn FnMut(&mut dyn RenderSurface)) {
        self.calls.push(DrawCall::Glow { color, radius });
        body(self);
    }

    fn present(&mut self) -> Result<(), EngineError> {
        if self.fail_present {
            return Err(EngineError::SurfaceUnavailable("recording surface closed".into()));
        }
        self.calls.push(DrawCall::Present);
        Ok(())
    }
}
