use crate::buffer::PixelBuffer;
use crate::geometry::{scaled_width, Point};
use crate::model::Color;
use crate::raster;

const CURVE_STEPS: u32 = 16;

/// Pen configuration applied to every sample of a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStyle {
    pub color: Color,
    pub width: f32,
    pub pressure_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokePhase {
    Idle,
    Drawing,
}

/// Incremental stroke rasterizer.
///
/// Samples are smoothed by drawing quadratic curves between consecutive
/// segment midpoints, with the raw sample as control point. The raw and
/// midpoint anchors are both populated for exactly as long as a stroke is
/// active.
#[derive(Debug)]
pub struct StrokeEngine {
    phase: StrokePhase,
    last_raw: Option<Point>,
    last_mid: Option<Point>,
}

impl Default for StrokeEngine {
    fn default() -> Self {
        StrokeEngine {
            phase: StrokePhase::Idle,
            last_raw: None,
            last_mid: None,
        }
    }
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.phase == StrokePhase::Drawing
    }

    /// Begins a stroke and stamps the initial dab so taps leave a mark.
    pub fn start(&mut self, buffer: &mut PixelBuffer, point: Point, pressure: f32, style: BrushStyle) {
        if self.phase == StrokePhase::Drawing {
            tracing::debug!("stroke start ignored while already drawing");
            return;
        }
        let width = sample_width(style, pressure);
        raster::draw_brush(buffer, point.rounded(), style.color, width);
        self.phase = StrokePhase::Drawing;
        self.last_raw = Some(point);
        self.last_mid = Some(point);
    }

    /// Extends the active stroke to `point`.
    ///
    /// The first sample after a start draws a straight segment to the raw
    /// point; later samples draw the flattened quadratic between the
    /// previous and new segment midpoints.
    pub fn extend(&mut self, buffer: &mut PixelBuffer, point: Point, pressure: f32, style: BrushStyle) {
        if self.phase != StrokePhase::Drawing {
            tracing::debug!("stroke extend ignored while idle");
            return;
        }
        let (last_raw, last_mid) = match (self.last_raw, self.last_mid) {
            (Some(raw), Some(mid)) => (raw, mid),
            _ => {
                tracing::debug!("stroke extend without anchors");
                return;
            }
        };

        let width = sample_width(style, pressure);
        let new_mid = last_raw.midpoint(point);
        if last_mid == last_raw {
            raster::draw_segment(buffer, last_raw.rounded(), point.rounded(), style.color, width);
        } else {
            let mut previous = last_mid;
            for step in 1..=CURVE_STEPS {
                let t = step as f32 / CURVE_STEPS as f32;
                let sample = quadratic_point(last_mid, last_raw, new_mid, t);
                raster::draw_segment(
                    buffer,
                    previous.rounded(),
                    sample.rounded(),
                    style.color,
                    width,
                );
                previous = sample;
            }
        }
        self.last_mid = Some(new_mid);
        self.last_raw = Some(point);
    }

    /// Finishes the active stroke and drops the smoothing anchors.
    pub fn end(&mut self) {
        if self.phase != StrokePhase::Drawing {
            tracing::debug!("stroke end ignored while idle");
            return;
        }
        self.phase = StrokePhase::Idle;
        self.last_raw = None;
        self.last_mid = None;
    }

    #[cfg(test)]
    pub fn last_raw_for_test(&self) -> Option<Point> {
        self.last_raw
    }
}

fn sample_width(style: BrushStyle, pressure: f32) -> u32 {
    scaled_width(style.width, pressure, style.pressure_enabled)
        .round()
        .max(1.0) as u32
}

fn quadratic_point(p0: Point, control: Point, p1: Point, t: f32) -> Point {
    let inv = 1.0 - t;
    Point::new(
        inv * inv * p0.x + 2.0 * inv * t * control.x + t * t * p1.x,
        inv * inv * p0.y + 2.0 * inv * t * control.y + t * t * p1.y,
    )
}

#[cfg(test)]
mod tests {
    use super::{BrushStyle, StrokeEngine};
    use crate::buffer::PixelBuffer;
    use crate::geometry::Point;
    use crate::model::Color;

    fn style(width: f32) -> BrushStyle {
        BrushStyle {
            color: Color::WHITE,
            width,
            pressure_enabled: false,
        }
    }

    fn ink_count(buffer: &PixelBuffer) -> usize {
        buffer
            .pixels
            .chunks_exact(4)
            .filter(|px| px[3] > 0)
            .count()
    }

    #[test]
    fn extend_without_start_leaves_buffer_untouched() {
        let mut buffer = PixelBuffer::new(32, 32, Color::TRANSPARENT);
        let mut engine = StrokeEngine::new();
        engine.extend(&mut buffer, Point::new(10.0, 10.0), 0.5, style(3.0));
        assert_eq!(ink_count(&buffer), 0);
        assert!(!engine.is_drawing());
    }

    #[test]
    fn start_stamps_a_dab_at_the_contact_point() {
        let mut buffer = PixelBuffer::new(32, 32, Color::TRANSPARENT);
        let mut engine = StrokeEngine::new();
        engine.start(&mut buffer, Point::new(12.0, 9.0), 0.0, style(3.0));
        assert!(engine.is_drawing());
        assert!(buffer.pixel(12, 9).is_ink());
    }

    #[test]
    fn second_start_is_ignored_while_drawing() {
        let mut buffer = PixelBuffer::new(32, 32, Color::TRANSPARENT);
        let mut engine = StrokeEngine::new();
        engine.start(&mut buffer, Point::new(5.0, 5.0), 0.0, style(1.0));
        engine.start(&mut buffer, Point::new(20.0, 20.0), 0.0, style(1.0));
        assert_eq!(engine.last_raw_for_test(), Some(Point::new(5.0, 5.0)));
        assert!(!buffer.pixel(20, 20).is_ink());
    }

    #[test]
    fn first_extend_reaches_the_raw_sample() {
        let mut buffer = PixelBuffer::new(64, 32, Color::TRANSPARENT);
        let mut engine = StrokeEngine::new();
        engine.start(&mut buffer, Point::new(10.0, 10.0), 0.0, style(1.0));
        engine.extend(&mut buffer, Point::new(30.0, 10.0), 0.0, style(1.0));
        for x in 10..=30 {
            assert!(buffer.pixel(x, 10).is_ink(), "gap at x={x}");
        }
    }

    #[test]
    fn later_extends_stop_at_the_segment_midpoint() {
        let mut buffer = PixelBuffer::new(64, 32, Color::TRANSPARENT);
        let mut engine = StrokeEngine::new();
        engine.start(&mut buffer, Point::new(10.0, 10.0), 0.0, style(1.0));
        engine.extend(&mut buffer, Point::new(30.0, 10.0), 0.0, style(1.0));
        engine.extend(&mut buffer, Point::new(50.0, 10.0), 0.0, style(1.0));
        assert!(buffer.pixel(40, 10).is_ink());
        assert!(!buffer.pixel(45, 10).is_ink());
        assert!(!buffer.pixel(50, 10).is_ink());
    }

    #[test]
    fn end_clears_the_smoothing_anchors() {
        let mut buffer = PixelBuffer::new(32, 32, Color::TRANSPARENT);
        let mut engine = StrokeEngine::new();
        engine.start(&mut buffer, Point::new(5.0, 5.0), 0.0, style(1.0));
        engine.end();
        assert!(!engine.is_drawing());
        assert_eq!(engine.last_raw_for_test(), None);
        let before = ink_count(&buffer);
        engine.extend(&mut buffer, Point::new(25.0, 25.0), 0.0, style(1.0));
        assert_eq!(ink_count(&buffer), before);
    }
}
