use super::{GradientBand, RenderSurface};
use crate::color::Rgb;
use crate::error::EngineError;
use crate::geometry::{Bounds, Point};
use std::io::Write;

/// Fraction of the glow color added at the inner edge of a halo.
const GLOW_STRENGTH: f32 = 0.6;

/// Half-block terminal back-end.
///
/// Each character cell holds two vertical pixels (background color on top,
/// foreground `▄` below). Drawing happens into a float RGB frame buffer in
/// pixel space; logical coordinates are divided by `scale` first.
pub struct TerminalSurface<W: Write> {
    out: W,
    width: usize,
    height: usize,
    scale: f32,
    background: Rgb,
    frame: Vec<(f32, f32, f32)>,
    opacity: f32,
    glow: Option<(Rgb, f32)>,
    output_buf: Vec<u8>,
}

impl<W: Write> TerminalSurface<W> {
    /// Surface sized to the current terminal.
    pub fn acquire(out: W, scale: f32, background: Rgb) -> Result<Self, EngineError> {
        let (cols, rows) = crossterm::terminal::size()
            .map_err(|err| EngineError::SurfaceUnavailable(format!("cannot query terminal size: {err}")))?;
        if cols == 0 || rows == 0 {
            return Err(EngineError::SurfaceUnavailable("terminal reports zero size".into()));
        }
        Ok(Self::new(out, cols as usize, rows as usize, scale, background))
    }

    pub fn new(out: W, cols: usize, rows: usize, scale: f32, background: Rgb) -> Self {
        let width = cols;
        let height = rows * 2;
        Self {
            out,
            width,
            height,
            scale: scale.max(f32::EPSILON),
            background,
            frame: vec![background.to_f32(); width * height],
            opacity: 1.0,
            glow: None,
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    /// Logical bounds of a terminal with `cols`×`rows` character cells.
    pub fn bounds_for(cols: u16, rows: u16, scale: f32) -> Bounds {
        Bounds::new(cols as f32 * scale, rows as f32 * 2.0 * scale)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Color of pixel `(x, y)` in pixel space.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (r, g, b) = self.frame[y * self.width + x];
        Some(Rgb(to_channel(r), to_channel(g), to_channel(b)))
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn to_pixel(&self, point: Point) -> (f32, f32) {
        (point.x / self.scale, point.y / self.scale)
    }

    /// Pixel range covering `[lo, hi]`, clipped to `0..limit`. Empty when
    /// the range misses the frame entirely.
    fn span(&self, lo: f32, hi: f32, limit: usize) -> (i64, i64) {
        let lo = (lo.floor() as i64).max(0);
        let hi = (hi.ceil() as i64).min(limit as i64 - 1);
        (lo, hi)
    }

    fn blend(&mut self, px: i64, py: i64, color: Rgb, alpha: f32) {
        if px < 0 || py < 0 || px as usize >= self.width || py as usize >= self.height {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let idx = py as usize * self.width + px as usize;
        let (r, g, b) = color.to_f32();
        let cell = &mut self.frame[idx];
        cell.0 += (r - cell.0) * alpha;
        cell.1 += (g - cell.1) * alpha;
        cell.2 += (b - cell.2) * alpha;
    }

    fn add(&mut self, px: i64, py: i64, color: Rgb, amount: f32) {
        if px < 0 || py < 0 || px as usize >= self.width || py as usize >= self.height {
            return;
        }
        let idx = py as usize * self.width + px as usize;
        let (r, g, b) = color.to_f32();
        let cell = &mut self.frame[idx];
        // Skip saturated channels so halos don't wash out to white
        if cell.0 < 250.0 {
            cell.0 = (cell.0 + r * amount).min(255.0);
        }
        if cell.1 < 250.0 {
            cell.1 = (cell.1 + g * amount).min(255.0);
        }
        if cell.2 < 250.0 {
            cell.2 = (cell.2 + b * amount).min(255.0);
        }
    }

    /// Fills every pixel whose center satisfies `inside`. Shapes smaller than
    /// a pixel still land on the pixel under their center, weighted by area.
    fn fill_shape(&mut self, min: (f32, f32), max: (f32, f32), area: f32, color: Rgb, inside: impl Fn(f32, f32) -> bool) {
        let mut hits = 0usize;
        let (x0, x1) = self.span(min.0, max.0, self.width);
        let (y0, y1) = self.span(min.1, max.1, self.height);
        for py in y0..=y1 {
            for px in x0..=x1 {
                if inside(px as f32 + 0.5, py as f32 + 0.5) {
                    self.blend(px, py, color, self.opacity);
                    hits += 1;
                }
            }
        }

        if hits == 0 && area.is_finite() {
            let cx = ((min.0 + max.0) * 0.5).floor() as i64;
            let cy = ((min.1 + max.1) * 0.5).floor() as i64;
            self.blend(cx, cy, color, self.opacity * area.clamp(0.0, 1.0));
        }
    }

    fn halo(&mut self, center: (f32, f32), extent: f32) {
        let Some((color, radius)) = self.glow else {
            return;
        };
        let reach = radius / self.scale;
        if reach <= 0.0 {
            return;
        }
        let outer = extent + reach;
        let (x0, x1) = self.span(center.0 - outer, center.0 + outer, self.width);
        let (y0, y1) = self.span(center.1 - outer, center.1 + outer, self.height);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - center.0;
                let dy = py as f32 + 0.5 - center.1;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > outer {
                    continue;
                }
                let falloff = if dist <= extent { 1.0 } else { 1.0 - (dist - extent) / reach };
                self.add(px, py, color, falloff * falloff * GLOW_STRENGTH * self.opacity);
            }
        }
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn size(&self) -> Bounds {
        Bounds::new(self.width as f32 * self.scale, self.height as f32 * self.scale)
    }

    fn resize(&mut self, bounds: Bounds) {
        self.width = (bounds.width / self.scale).round().max(0.0) as usize;
        self.height = (bounds.height / self.scale).round().max(0.0) as usize;
        self.frame = vec![self.background.to_f32(); self.width * self.height];
        self.output_buf = Vec::with_capacity(self.width * self.height * 25);
    }

    fn clear(&mut self) {
        let bg = self.background.to_f32();
        self.frame.fill(bg);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb) {
        let (cx, cy) = self.to_pixel(center);
        let r = radius / self.scale;
        self.halo((cx, cy), r);
        self.fill_shape((cx - r, cy - r), (cx + r, cy + r), std::f32::consts::PI * r * r, color, |x, y| {
            let dx = x - cx;
            let dy = y - cy;
            dx * dx + dy * dy <= r * r
        });
    }

    fn fill_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32, rotation: f32, color: Rgb) {
        let (cx, cy) = self.to_pixel(center);
        let rx = (radius_x / self.scale).max(f32::EPSILON);
        let ry = (radius_y / self.scale).max(f32::EPSILON);
        let reach = rx.max(ry);
        self.halo((cx, cy), reach);

        let (sin, cos) = (-rotation).sin_cos();
        self.fill_shape((cx - reach, cy - reach), (cx + reach, cy + reach), std::f32::consts::PI * rx * ry, color, |x, y| {
            let dx = x - cx;
            let dy = y - cy;
            let u = dx * cos - dy * sin;
            let v = dx * sin + dy * cos;
            (u / rx).powi(2) + (v / ry).powi(2) <= 1.0
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb) {
        if points.len() < 3 {
            return;
        }
        let pixels: Vec<(f32, f32)> = points.iter().map(|p| self.to_pixel(*p)).collect();

        let mut min = (f32::MAX, f32::MAX);
        let mut max = (f32::MIN, f32::MIN);
        let mut area = 0.0;
        for (i, &(x, y)) in pixels.iter().enumerate() {
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
            let (nx, ny) = pixels[(i + 1) % pixels.len()];
            area += x * ny - nx * y;
        }
        if !(min.0.is_finite() && min.1.is_finite() && max.0.is_finite() && max.1.is_finite()) {
            return;
        }

        let center = ((min.0 + max.0) * 0.5, (min.1 + max.1) * 0.5);
        self.halo(center, ((max.0 - min.0).max(max.1 - min.1)) * 0.5);

        self.fill_shape(min, max, (area * 0.5).abs(), color, |x, y| {
            // Even-odd crossing test
            let mut inside = false;
            let mut j = pixels.len() - 1;
            for i in 0..pixels.len() {
                let (xi, yi) = pixels[i];
                let (xj, yj) = pixels[j];
                if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
            inside
        });
    }

    fn stroke(&mut self, from: Point, to: Point, width: f32, color: Rgb) {
        let (ax, ay) = self.to_pixel(from);
        let (bx, by) = self.to_pixel(to);
        let half = (width / self.scale * 0.5).max(0.5);
        let (dx, dy) = (bx - ax, by - ay);
        let len_sq = dx * dx + dy * dy;

        self.fill_shape(
            (ax.min(bx) - half, ay.min(by) - half),
            (ax.max(bx) + half, ay.max(by) + half),
            len_sq.sqrt() * half * 2.0,
            color,
            |x, y| {
                let t = if len_sq > 0.0 { (((x - ax) * dx + (y - ay) * dy) / len_sq).clamp(0.0, 1.0) } else { 0.0 };
                let ex = x - (ax + dx * t);
                let ey = y - (ay + dy * t);
                ex * ex + ey * ey <= half * half
            },
        );
    }

    fn fill_linear_gradient(&mut self, band: &GradientBand) {
        let thickness = band.thickness / self.scale;
        if thickness <= 0.0 {
            return;
        }

        for px in 0..self.width {
            let x = (px as f32 + 0.5) * self.scale;
            let Some(crest) = band.crest_at(x) else {
                return;
            };
            let crest = crest / self.scale;

            for py in (crest - thickness).floor() as i64..=(crest + thickness).ceil() as i64 {
                let dist = (py as f32 + 0.5 - crest).abs() / thickness;
                if dist > 1.0 {
                    continue;
                }
                let falloff = (dist * std::f32::consts::FRAC_PI_2).cos();
                let intensity = band.opacity * self.opacity * falloff * falloff;
                if intensity > 0.02 {
                    self.add(px as i64, py, band.inner.lerp(band.outer, dist), intensity);
                }
            }
        }
    }

    fn with_opacity(&mut self, opacity: f32, body: &mut dyn FnMut(&mut dyn RenderSurface)) {
        let saved = self.opacity;
        self.opacity = saved * opacity.clamp(0.0, 1.0);
        body(self);
        self.opacity = saved;
    }

    fn with_glow(&mut self, color: Rgb, radius: f32, body: &mut dyn FnMut(&mut dyn RenderSurface)) {
        let saved = self.glow.replace((color, radius));
        body(self);
        self.glow = saved;
    }

    fn present(&mut self) -> Result<(), EngineError> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixel(x, y).unwrap_or(self.background);
                let bot = self.pixel(x, y + 1).unwrap_or(top);

                // Only emit color codes if changed
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        self.out.write_all(&self.output_buf)?;
        self.out.flush()?;
        Ok(())
    }
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(cols: usize, rows: usize) -> TerminalSurface<Vec<u8>> {
        TerminalSurface::new(Vec::new(), cols, rows, 4.0, Rgb::BLACK)
    }

    #[test]
    fn size_is_logical() {
        let s = surface(20, 10);
        assert_eq!(s.size(), Bounds::new(80.0, 80.0));
        assert_eq!(TerminalSurface::<Vec<u8>>::bounds_for(20, 10, 4.0), s.size());
    }

    #[test]
    fn circle_paints_center_pixel() {
        let mut s = surface(20, 10);
        s.fill_circle(Point::new(40.0, 40.0), 8.0, Rgb(255, 0, 0));
        assert_eq!(s.pixel(10, 10), Some(Rgb(255, 0, 0)));
        assert_eq!(s.pixel(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn tiny_shapes_still_leave_a_trace() {
        let mut s = surface(20, 10);
        s.fill_circle(Point::new(41.0, 41.0), 0.5, Rgb::WHITE);
        let Rgb(r, _, _) = s.pixel(10, 10).unwrap();
        assert!(r > 0);
    }

    #[test]
    fn opacity_blends_with_background() {
        let mut s = surface(4, 2);
        s.with_opacity(0.5, &mut |s| s.fill_circle(Point::new(8.0, 8.0), 4.0, Rgb::WHITE));
        assert_eq!(s.pixel(2, 2), Some(Rgb(128, 128, 128)));
    }

    #[test]
    fn glow_brightens_surroundings() {
        let mut s = surface(20, 10);
        s.with_glow(Rgb(255, 255, 0), 16.0, &mut |s| s.fill_circle(Point::new(40.0, 40.0), 2.0, Rgb::WHITE));
        let Rgb(r, g, b) = s.pixel(12, 10).unwrap();
        assert!(r > 0 && g > 0);
        assert_eq!(b, 0);
    }

    #[test]
    fn gradient_spans_full_width() {
        let mut s = surface(10, 5);
        let band = GradientBand {
            crest: vec![Point::new(0.0, 20.0), Point::new(40.0, 20.0)],
            thickness: 8.0,
            inner: Rgb(0, 255, 0),
            outer: Rgb(0, 0, 255),
            opacity: 1.0,
        };
        s.fill_linear_gradient(&band);
        for x in 0..10 {
            assert!(s.pixel(x, 4).unwrap().1 > 0, "column {x} untouched");
        }
    }

    #[test]
    fn clear_resets_to_background() {
        let mut s = TerminalSurface::new(Vec::new(), 4, 2, 4.0, Rgb(10, 20, 30));
        s.fill_circle(Point::new(8.0, 8.0), 8.0, Rgb::WHITE);
        s.clear();
        assert_eq!(s.pixel(2, 2), Some(Rgb(10, 20, 30)));
    }

    #[test]
    fn resize_reallocates_frame() {
        let mut s = surface(4, 2);
        s.resize(Bounds::new(48.0, 32.0));
        assert_eq!(s.size(), Bounds::new(48.0, 32.0));
        assert!(s.pixel(11, 7).is_some());
        assert!(s.pixel(12, 0).is_none());
    }

    #[test]
    fn present_writes_one_half_block_per_cell() {
        let mut s = surface(6, 3);
        s.present().unwrap();
        let out = String::from_utf8(s.into_inner()).unwrap();
        assert!(out.starts_with("\x1b[H"));
        assert_eq!(out.matches('▄').count(), 18);
        assert_eq!(out.matches("\r\n").count(), 2);
    }
}
