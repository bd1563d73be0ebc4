//! Geometry state for the clipper: the fitted image rectangle, the centered
//! crop window, and the boundary clamp that keeps the window covered.
//!
//! Everything here is in CSS pixels and has no DOM dependency, so the whole
//! gesture math is testable off-browser.

/// Width of the design viewport that configuration lengths are expressed in.
/// A length of 750 units always spans the full screen width.
pub const DESIGN_WIDTH: f64 = 750.0;

/// Convert a design-unit length to CSS pixels for the current screen.
pub fn design_to_px(units: f64, screen_width: f64) -> f64 {
    units / DESIGN_WIDTH * screen_width
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

/// The fixed crop window: configured size, always centered in the viewport.
/// Gestures never move it; only configuration changes it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CropWindow {
    pub width: f64,
    pub height: f64,
    pub viewport: Size,
}

impl CropWindow {
    pub fn new(width: f64, height: f64, viewport: Size) -> Self {
        Self {
            width,
            height,
            viewport,
        }
    }

    pub fn left(&self) -> f64 {
        (self.viewport.width - self.width) / 2.0
    }

    pub fn top(&self) -> f64 {
        (self.viewport.height - self.height) / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect {
            left: self.left(),
            top: self.top(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Clamp one axis of the image position so the window stays covered.
/// The image's leading edge may not pass the window's leading edge, and its
/// trailing edge may not pull back past the window's trailing edge.
/// Total and idempotent for any input.
pub fn clamp_axis(pos: f64, size: f64, win_start: f64, win_size: f64) -> f64 {
    let lead = win_start;
    let trail = win_start + win_size - size;
    pos.min(lead).max(trail)
}

/// Clamp a proposed image position against the crop window on both axes.
pub fn clamp_to_window(proposed: Point, size: Size, crop: &CropWindow) -> Point {
    Point {
        x: clamp_axis(proposed.x, size.width, crop.left(), crop.width),
        y: clamp_axis(proposed.y, size.height, crop.top(), crop.height),
    }
}

/// Position, size and baselines of the displayed image. All fields that a
/// gesture tick touches live here so they update together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipperGeometry {
    /// Natural image size in source pixels.
    natural: Size,
    /// Displayed size at scale 1 (the fit size).
    base: Size,
    /// Current on-screen rect of the image.
    rect: Rect,
    /// Position snapshot taken at the end of the last gesture.
    baseline: Point,
    scale: f64,
    /// Scale snapshot taken at the end of the last gesture.
    scale_baseline: f64,
    initialized: bool,
}

impl ClipperGeometry {
    /// Fit the image over the crop window: the axis that is narrower relative
    /// to the window fills it exactly, the other overflows (or matches).
    /// Centered in the viewport, scale 1, baselines at the fit position.
    pub fn fit(natural: Size, crop: &CropWindow) -> Self {
        let base = if natural.width / natural.height < crop.width / crop.height {
            Size {
                width: crop.width,
                height: crop.width * natural.height / natural.width,
            }
        } else {
            Size {
                width: crop.height * natural.width / natural.height,
                height: crop.height,
            }
        };
        let left = (crop.viewport.width - base.width) / 2.0;
        let top = (crop.viewport.height - base.height) / 2.0;
        Self {
            natural,
            base,
            rect: Rect {
                left,
                top,
                width: base.width,
                height: base.height,
            },
            baseline: Point { x: left, y: top },
            scale: 1.0,
            scale_baseline: 1.0,
            initialized: true,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn image_rect(&self) -> Rect {
        self.rect
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.rect.width,
            height: self.rect.height,
        }
    }

    pub fn scale_baseline(&self) -> f64 {
        self.scale_baseline
    }

    /// Apply a pan delta relative to the baseline, clamped to the window.
    pub fn pan(&mut self, dx: f64, dy: f64, crop: &CropWindow) {
        let proposed = Point {
            x: self.baseline.x + dx,
            y: self.baseline.y + dy,
        };
        let p = clamp_to_window(proposed, self.size(), crop);
        self.rect.left = p.x;
        self.rect.top = p.y;
    }

    /// Apply an already-clamped scale factor. The image grows/shrinks around
    /// the baseline position, shifted by half the size change relative to the
    /// size it had when the pinch started, then gets clamped to the window.
    pub fn apply_scale(&mut self, scale: f64, session_size: Size, crop: &CropWindow) {
        self.scale = scale;
        self.rect.width = self.base.width * scale;
        self.rect.height = self.base.height * scale;
        let proposed = Point {
            x: self.baseline.x - (self.rect.width - session_size.width) / 2.0,
            y: self.baseline.y - (self.rect.height - session_size.height) / 2.0,
        };
        let p = clamp_to_window(proposed, self.size(), crop);
        self.rect.left = p.x;
        self.rect.top = p.y;
    }

    /// Snapshot the current position and scale as the baselines for the next
    /// gesture. Called on touch-end.
    pub fn commit(&mut self) {
        self.baseline = Point {
            x: self.rect.left,
            y: self.rect.top,
        };
        self.scale_baseline = self.scale;
    }

    /// The sub-rectangle of the source image (in natural pixels) currently
    /// visible through the crop window. Inverse of the screen transform.
    pub fn source_rect(&self, crop: &CropWindow) -> Rect {
        Rect {
            left: (crop.left() - self.rect.left) / self.rect.width * self.natural.width,
            top: (crop.top() - self.rect.top) / self.rect.height * self.natural.height,
            width: crop.width / self.rect.width * self.natural.width,
            height: crop.height / self.rect.height * self.natural.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn crop_500(viewport: Size) -> CropWindow {
        CropWindow::new(500.0, 500.0, viewport)
    }

    #[test]
    fn fit_wide_image_fills_height() {
        // 1000x500 into a 500x500 window: ratio 2.0 > 1.0, so height fits.
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let g = ClipperGeometry::fit(
            Size {
                width: 1000.0,
                height: 500.0,
            },
            &crop,
        );
        let r = g.image_rect();
        assert_eq!(r.width, 1000.0);
        assert_eq!(r.height, 500.0);
        assert_eq!(r.left, (750.0 - 1000.0) / 2.0);
        assert!(r.contains(&crop.rect()));
    }

    #[test]
    fn fit_tall_image_fills_width() {
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let g = ClipperGeometry::fit(
            Size {
                width: 400.0,
                height: 800.0,
            },
            &crop,
        );
        let r = g.image_rect();
        assert_eq!(r.width, 500.0);
        assert_eq!(r.height, 1000.0);
        // width exactly matches the window, so left aligns with it
        assert_eq!(r.left, crop.left());
        assert!(r.contains(&crop.rect()));
    }

    #[test]
    fn refit_discards_previous_state() {
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let mut g = ClipperGeometry::fit(
            Size {
                width: 1000.0,
                height: 500.0,
            },
            &crop,
        );
        g.pan(-300.0, -40.0, &crop);
        g.commit();
        // new source replaces everything; no trace of the old baselines
        let fresh = ClipperGeometry::fit(
            Size {
                width: 1000.0,
                height: 500.0,
            },
            &crop,
        );
        let refit = ClipperGeometry::fit(
            Size {
                width: 1000.0,
                height: 500.0,
            },
            &crop,
        );
        assert_ne!(g, fresh);
        assert_eq!(refit, fresh);
    }

    #[test]
    fn pan_baselines_compose_across_commits() {
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let mut g = ClipperGeometry::fit(
            Size {
                width: 2000.0,
                height: 1000.0,
            },
            &crop,
        );
        g.pan(-100.0, 0.0, &crop);
        g.commit();
        let after_first = g.image_rect();
        // the second gesture is relative to the committed position, not the
        // original fit position
        g.pan(-50.0, 10.0, &crop);
        let r = g.image_rect();
        let expected = clamp_to_window(
            Point {
                x: after_first.left - 50.0,
                y: after_first.top + 10.0,
            },
            g.size(),
            &crop,
        );
        assert_eq!(r.left, expected.x);
        assert_eq!(r.top, expected.y);
    }

    #[test]
    fn uncommitted_pan_does_not_move_baseline() {
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let mut g = ClipperGeometry::fit(
            Size {
                width: 2000.0,
                height: 1000.0,
            },
            &crop,
        );
        g.pan(-100.0, 0.0, &crop);
        let moved = g.image_rect().left;
        // a second move event of the same gesture replaces the delta
        g.pan(-20.0, 0.0, &crop);
        assert_eq!(g.image_rect().left, moved + 80.0);
    }

    #[test]
    fn apply_scale_grows_around_center_and_clamps() {
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let mut g = ClipperGeometry::fit(
            Size {
                width: 500.0,
                height: 500.0,
            },
            &crop,
        );
        let session = g.size();
        g.apply_scale(2.0, session, &crop);
        let r = g.image_rect();
        assert_eq!(r.width, 1000.0);
        assert_eq!(r.height, 1000.0);
        assert!(r.contains(&crop.rect()));
        // size invariant: displayed == base * scale
        assert_eq!(r.width, 500.0 * 2.0);
    }

    #[test]
    fn source_rect_maps_window_back_to_natural_pixels() {
        let crop = crop_500(Size {
            width: 750.0,
            height: 1334.0,
        });
        let g = ClipperGeometry::fit(
            Size {
                width: 2000.0,
                height: 1000.0,
            },
            &crop,
        );
        // displayed 1000x500 at left=-125; window starts at x=125
        let src = g.source_rect(&crop);
        assert_eq!(src.left, (125.0 - -125.0) / 1000.0 * 2000.0);
        assert_eq!(src.width, 500.0 / 1000.0 * 2000.0);
        assert_eq!(src.height, 500.0 / 500.0 * 1000.0);
    }

    #[test]
    fn clamp_snaps_leading_and_trailing_edges() {
        // window [100, 600), image width 800
        assert_eq!(clamp_axis(150.0, 800.0, 100.0, 500.0), 100.0);
        assert_eq!(clamp_axis(-500.0, 800.0, 100.0, 500.0), -200.0);
        assert_eq!(clamp_axis(-50.0, 800.0, 100.0, 500.0), -50.0);
    }

    proptest! {
        #[test]
        fn fit_always_covers_the_window(
            img_w in 1.0f64..5000.0,
            img_h in 1.0f64..5000.0,
            crop_w in 50.0f64..700.0,
            crop_h in 50.0f64..700.0,
            vp_w in 700.0f64..2000.0,
            vp_h in 700.0f64..2000.0,
        ) {
            let crop = CropWindow::new(crop_w, crop_h, Size { width: vp_w, height: vp_h });
            let g = ClipperGeometry::fit(Size { width: img_w, height: img_h }, &crop);
            let r = g.image_rect();
            // float division can leave the exactly-fitting axis a hair short
            let eps = 1e-9 * (crop_w + crop_h);
            prop_assert!(r.left <= crop.left() + eps);
            prop_assert!(r.top <= crop.top() + eps);
            prop_assert!(r.right() >= crop.left() + crop_w - eps);
            prop_assert!(r.bottom() >= crop.top() + crop_h - eps);
        }

        #[test]
        fn clamp_is_idempotent_and_preserves_coverage(
            pos in -1e6f64..1e6,
            extra in 0.0f64..3000.0,
            win_start in -500.0f64..500.0,
            win_size in 1.0f64..800.0,
        ) {
            let size = win_size + extra;
            let once = clamp_axis(pos, size, win_start, win_size);
            prop_assert_eq!(clamp_axis(once, size, win_start, win_size), once);
            prop_assert!(once <= win_start);
            prop_assert!(once + size >= win_start + win_size);
        }

        #[test]
        fn scaling_then_panning_never_exposes_the_window(
            scale in 1.0f64..5.0,
            dx in -5000.0f64..5000.0,
            dy in -5000.0f64..5000.0,
            img_w in 1.0f64..5000.0,
            img_h in 1.0f64..5000.0,
        ) {
            let crop = CropWindow::new(500.0, 500.0, Size { width: 750.0, height: 1334.0 });
            let mut g = ClipperGeometry::fit(Size { width: img_w, height: img_h }, &crop);
            let session = g.size();
            g.apply_scale(scale, session, &crop);
            g.commit();
            g.pan(dx, dy, &crop);
            let r = g.image_rect();
            let eps = 1e-6;
            prop_assert!(r.left <= crop.left() + eps);
            prop_assert!(r.top <= crop.top() + eps);
            prop_assert!(r.right() >= crop.left() + crop.width - eps);
            prop_assert!(r.bottom() >= crop.top() + crop.height - eps);
        }
    }
}
