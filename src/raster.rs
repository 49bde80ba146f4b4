use crate::buffer::PixelBuffer;
use crate::model::Color;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

/// Strokes at least this wide are filled as a capsule instead of being
/// densely stamped along the segment.
pub const WIDE_STROKE_THRESHOLD: u32 = 10;

const MASK_CACHE_MIN_WIDTH: u32 = 4;

#[derive(Clone)]
struct BrushMask {
    rows: Vec<BrushMaskRow>,
}

#[derive(Clone)]
struct BrushMaskRow {
    dy: i32,
    min_dx: i32,
    max_dx: i32,
}

static BRUSH_MASKS: Lazy<Mutex<HashMap<u32, BrushMask>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn brush_mask(width: u32) -> BrushMask {
    if let Ok(guard) = BRUSH_MASKS.lock() {
        if let Some(mask) = guard.get(&width) {
            return mask.clone();
        }
    }

    let radius = (width.saturating_sub(1) / 2) as i32;
    let mut rows = Vec::with_capacity((radius * 2 + 1) as usize);
    for dy in -radius..=radius {
        let mut max_dx = radius;
        while max_dx >= 0 && max_dx * max_dx + dy * dy > radius * radius {
            max_dx -= 1;
        }
        if max_dx >= 0 {
            rows.push(BrushMaskRow {
                dy,
                min_dx: -max_dx,
                max_dx,
            });
        }
    }
    let mask = BrushMask { rows };
    if let Ok(mut guard) = BRUSH_MASKS.lock() {
        let _ = guard.insert(width, mask.clone());
    }
    mask
}

/// Stamps one circular brush dab centered on `center`.
pub fn draw_brush(buffer: &mut PixelBuffer, center: (i32, i32), color: Color, width: u32) {
    let width = width.max(1);
    if width >= MASK_CACHE_MIN_WIDTH {
        draw_brush_masked(buffer, center, color, width);
        return;
    }

    let radius = (width.saturating_sub(1) / 2) as i32;
    for y in (center.1 - radius)..=(center.1 + radius) {
        for x in (center.0 - radius)..=(center.0 + radius) {
            let dx = x - center.0;
            let dy = y - center.1;
            if dx * dx + dy * dy <= radius * radius {
                buffer.set_pixel(x, y, color);
            }
        }
    }
}

fn draw_brush_masked(buffer: &mut PixelBuffer, center: (i32, i32), color: Color, width: u32) {
    let mask = brush_mask(width);
    for row in &mask.rows {
        let y = center.1 + row.dy;
        for x in (center.0 + row.min_dx)..=(center.0 + row.max_dx) {
            buffer.set_pixel(x, y, color);
        }
    }
}

/// Rasterizes one stroke segment. Narrow strokes stamp a brush along a
/// Bresenham walk of the segment; wide strokes fill the capsule around it
/// with a per-pixel distance test.
pub fn draw_segment(
    buffer: &mut PixelBuffer,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    width: u32,
) {
    let width = width.max(1);
    let dx = (end.0 - start.0) as i64;
    let dy = (end.1 - start.1) as i64;
    if width < WIDE_STROKE_THRESHOLD || dx * dx + dy * dy <= 2 {
        draw_segment_dense(buffer, start, end, color, width);
    } else {
        draw_segment_capsule(buffer, start, end, color, width);
    }
}

fn draw_segment_dense(
    buffer: &mut PixelBuffer,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    width: u32,
) {
    let mut x0 = start.0;
    let mut y0 = start.1;
    let x1 = end.0;
    let y1 = end.1;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        draw_brush(buffer, (x0, y0), color, width);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_segment_capsule(
    buffer: &mut PixelBuffer,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    width: u32,
) {
    if buffer.width == 0 || buffer.height == 0 {
        return;
    }

    let radius = (width as f32 - 1.0) / 2.0;
    let pad = radius.ceil() as i32 + 1;
    let x0 = (start.0.min(end.0) - pad).max(0);
    let x1 = (start.0.max(end.0) + pad).min(buffer.width as i32 - 1);
    let y0 = (start.1.min(end.1) - pad).max(0);
    let y1 = (start.1.max(end.1) + pad).min(buffer.height as i32 - 1);

    let radius_sq = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            if point_segment_distance_sq((x, y), start, end) <= radius_sq {
                buffer.set_pixel(x, y, color);
            }
        }
    }
}

fn point_segment_distance_sq(point: (i32, i32), start: (i32, i32), end: (i32, i32)) -> f32 {
    let px = point.0 as f32;
    let py = point.1 as f32;
    let x0 = start.0 as f32;
    let y0 = start.1 as f32;
    let x1 = end.0 as f32;
    let y1 = end.1 as f32;
    let vx = x1 - x0;
    let vy = y1 - y0;
    let wx = px - x0;
    let wy = py - y0;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        let dx = px - x0;
        let dy = py - y0;
        return dx * dx + dy * dy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let cx = x0 + vx * t;
    let cy = y0 + vy * t;
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::{draw_brush, draw_segment, point_segment_distance_sq, WIDE_STROKE_THRESHOLD};
    use crate::buffer::PixelBuffer;
    use crate::model::Color;

    fn ink_count(buffer: &PixelBuffer) -> usize {
        buffer
            .pixels
            .chunks_exact(4)
            .filter(|px| px[3] > 0)
            .count()
    }

    #[test]
    fn brush_dab_writes_center_pixel() {
        let mut buffer = PixelBuffer::new(16, 16, Color::TRANSPARENT);
        draw_brush(&mut buffer, (8, 8), Color::WHITE, 1);
        assert_eq!(buffer.pixel(8, 8), Color::WHITE);
        assert_eq!(ink_count(&buffer), 1);
    }

    #[test]
    fn masked_brush_is_symmetric_around_center() {
        let mut buffer = PixelBuffer::new(32, 32, Color::TRANSPARENT);
        draw_brush(&mut buffer, (16, 16), Color::WHITE, 9);
        for dy in -4..=4i32 {
            for dx in -4..=4i32 {
                let a = buffer.pixel((16 + dx) as u32, (16 + dy) as u32);
                let b = buffer.pixel((16 - dx) as u32, (16 - dy) as u32);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn segment_connects_endpoints_without_gaps() {
        let mut buffer = PixelBuffer::new(32, 32, Color::TRANSPARENT);
        draw_segment(&mut buffer, (2, 2), (29, 17), Color::WHITE, 1);
        assert_eq!(buffer.pixel(2, 2), Color::WHITE);
        assert_eq!(buffer.pixel(29, 17), Color::WHITE);
        assert!(ink_count(&buffer) >= 28);
    }

    #[test]
    fn wide_segment_covers_at_least_the_dense_footprint() {
        let width = WIDE_STROKE_THRESHOLD + 4;
        let mut dense = PixelBuffer::new(64, 64, Color::TRANSPARENT);
        super::draw_segment_dense(&mut dense, (10, 30), (50, 34), Color::WHITE, width);
        let mut capsule = PixelBuffer::new(64, 64, Color::TRANSPARENT);
        super::draw_segment_capsule(&mut capsule, (10, 30), (50, 34), Color::WHITE, width);

        for y in 0..64 {
            for x in 0..64 {
                if dense.pixel(x, y).is_ink() {
                    assert!(capsule.pixel(x, y).is_ink(), "hole at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn drawing_is_bounds_safe_for_offscreen_segments() {
        let mut buffer = PixelBuffer::new(8, 8, Color::TRANSPARENT);
        draw_segment(&mut buffer, (-100, -100), (100, 100), Color::WHITE, 20);
        draw_brush(&mut buffer, (-5, -5), Color::WHITE, 7);
        assert_eq!(buffer.pixels.len(), 8 * 8 * 4);
        assert!(ink_count(&buffer) > 0);
    }

    #[test]
    fn zero_length_segment_degenerates_to_a_dab() {
        let mut buffer = PixelBuffer::new(16, 16, Color::TRANSPARENT);
        draw_segment(&mut buffer, (8, 8), (8, 8), Color::WHITE, 3);
        assert!(buffer.pixel(8, 8).is_ink());
    }

    #[test]
    fn point_segment_distance_handles_degenerate_segment() {
        assert_eq!(point_segment_distance_sq((3, 4), (0, 0), (0, 0)), 25.0);
        assert_eq!(point_segment_distance_sq((5, 0), (0, 0), (10, 0)), 0.0);
        assert_eq!(point_segment_distance_sq((5, 3), (0, 0), (10, 0)), 9.0);
    }
}
