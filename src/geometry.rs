/// Width/height of the drawing surface in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when nothing can be placed on the surface.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Clamps a point into `[0,width]×[0,height]`.
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(0.0, self.width.max(0.0)),
            y: point.y.clamp(0.0, self.height.max(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotates around the origin by `angle` radians, then translates by `offset`.
    pub fn rotated(&self, angle: f32, offset: Point) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: self.x * cos - self.y * sin + offset.x,
            y: self.x * sin + self.y * cos + offset.y,
        }
    }
}
