#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn rounded(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Translates a client-space position into canvas space given the canvas
/// origin in the same client coordinates.
pub fn canvas_relative(client: Point, origin: Point) -> Point {
    Point::new(client.x - origin.x, client.y - origin.y)
}

/// Pressure curve applied to the base brush width. Zero (or absent)
/// pressure leaves the width unchanged.
pub fn pressure_multiplier(pressure: f32) -> f32 {
    if pressure > 0.0 {
        0.5 + pressure * 1.5
    } else {
        1.0
    }
}

/// Effective brush width for one sample, floored at one pixel.
pub fn scaled_width(base: f32, pressure: f32, pressure_enabled: bool) -> f32 {
    let multiplier = if pressure_enabled {
        pressure_multiplier(pressure)
    } else {
        1.0
    };
    (base * multiplier).max(1.0)
}
