//! Touch gesture interpreter. The mode is picked at touch-start and stays
//! fixed until the next touch-start; move events that do not match the
//! active mode are dropped by the caller.

use super::geometry::{Point, Size};

/// Zoom factor gained per pixel of finger-spread change.
pub const PINCH_SENSITIVITY: f64 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// One finger down; `start` is the first touch point.
    Panning { start: Point },
    /// Two or more fingers down; the session captures the initial spread and
    /// the image size at gesture start.
    Scaling { start_distance: f64, start_size: Size },
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

impl Gesture {
    pub fn begin_pan(start: Point) -> Self {
        Gesture::Panning { start }
    }

    pub fn begin_pinch(a: Point, b: Point, current_size: Size) -> Self {
        Gesture::Scaling {
            start_distance: distance(a, b),
            start_size: current_size,
        }
    }

    /// Pan delta of the current move event, relative to the gesture start.
    /// `None` unless a pan is active.
    pub fn pan_delta(&self, current: Point) -> Option<(f64, f64)> {
        match self {
            Gesture::Panning { start } => Some((current.x - start.x, current.y - start.y)),
            _ => None,
        }
    }

    /// New scale for the current move event, clamped to `[1, max_scale]`,
    /// together with the image size captured at gesture start. `None` unless
    /// a pinch is active.
    pub fn pinch_scale(
        &self,
        a: Point,
        b: Point,
        scale_baseline: f64,
        max_scale: f64,
    ) -> Option<(f64, Size)> {
        match *self {
            Gesture::Scaling {
                start_distance,
                start_size,
            } => {
                let max = max_scale.max(1.0);
                let scale = scale_baseline + PINCH_SENSITIVITY * (distance(a, b) - start_distance);
                Some((scale.clamp(1.0, max), start_size))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    const SIZE: Size = Size {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn pan_delta_is_relative_to_start() {
        let g = Gesture::begin_pan(p(100.0, 200.0));
        assert_eq!(g.pan_delta(p(130.0, 180.0)), Some((30.0, -20.0)));
    }

    #[test]
    fn pinch_scale_tracks_spread_change() {
        // fingers 100px apart, spread to 200px: +100px * 0.01 = +1.0
        let g = Gesture::begin_pinch(p(0.0, 0.0), p(100.0, 0.0), SIZE);
        let (scale, size) = g.pinch_scale(p(0.0, 0.0), p(200.0, 0.0), 1.0, 5.0).unwrap();
        assert_eq!(scale, 2.0);
        assert_eq!(size, SIZE);
    }

    #[test]
    fn pinch_scale_clamps_to_exact_bounds() {
        let g = Gesture::begin_pinch(p(0.0, 0.0), p(500.0, 0.0), SIZE);
        // collapsing the spread would compute a scale far below 1
        let (low, _) = g.pinch_scale(p(0.0, 0.0), p(0.0, 0.0), 1.0, 5.0).unwrap();
        assert_eq!(low, 1.0);
        // a huge spread saturates at max_scale
        let (high, _) = g
            .pinch_scale(p(0.0, 0.0), p(5000.0, 0.0), 1.0, 5.0)
            .unwrap();
        assert_eq!(high, 5.0);
    }

    #[test]
    fn max_scale_below_one_is_floored() {
        let g = Gesture::begin_pinch(p(0.0, 0.0), p(100.0, 0.0), SIZE);
        let (scale, _) = g.pinch_scale(p(0.0, 0.0), p(900.0, 0.0), 1.0, 0.5).unwrap();
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn pinch_resumes_from_committed_scale() {
        let g = Gesture::begin_pinch(p(0.0, 0.0), p(100.0, 0.0), SIZE);
        let (scale, _) = g.pinch_scale(p(0.0, 0.0), p(150.0, 0.0), 2.5, 5.0).unwrap();
        assert_eq!(scale, 3.0);
    }

    #[test]
    fn mode_is_fixed_for_the_gesture() {
        let pan = Gesture::begin_pan(p(0.0, 0.0));
        assert_eq!(pan.pinch_scale(p(0.0, 0.0), p(50.0, 0.0), 1.0, 5.0), None);
        let pinch = Gesture::begin_pinch(p(0.0, 0.0), p(100.0, 0.0), SIZE);
        assert_eq!(pinch.pan_delta(p(10.0, 10.0)), None);
        assert_eq!(Gesture::Idle.pan_delta(p(10.0, 10.0)), None);
    }

    #[test]
    fn diagonal_distance() {
        assert_eq!(distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0);
    }
}
