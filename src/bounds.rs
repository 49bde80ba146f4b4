use crate::buffer::PixelBuffer;
use crate::geometry::Point;

/// Axis-aligned bounding box of every inked pixel in a buffer.
///
/// An empty buffer yields the degenerate box `min > max`, which callers
/// detect through [`InkBounds::is_empty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl InkBounds {
    /// Scans the full buffer and collects the extent of pixels with
    /// non-zero alpha.
    pub fn scan(buffer: &PixelBuffer) -> Self {
        let mut bounds = InkBounds {
            min_x: buffer.width,
            min_y: buffer.height,
            max_x: 0,
            max_y: 0,
        };
        for (i, px) in buffer.pixels.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let x = i as u32 % buffer.width;
            let y = i as u32 / buffer.width;
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Geometric center of the box, `None` when no ink was found.
    pub fn center(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        Some(Point::new(
            (self.min_x + self.max_x) as f32 / 2.0,
            (self.min_y + self.max_y) as f32 / 2.0,
        ))
    }
}
