//! Pointer-to-image coordinate transforms.
//!
//! Region geometry is stored normalized to `[0,1]` of the rendered image,
//! so saved records are independent of window size and display scale.

/// A point in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

/// An axis-aligned rectangle in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NormRect {
    /// Rectangle spanned by two drag endpoints, in any order.
    pub fn from_drag(a: NormPoint, b: NormPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Whether a point falls inside the rectangle, edges included.
    pub fn contains(&self, p: NormPoint) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// The displayed image element's bounding rectangle in viewport pixels.
///
/// Must be refreshed on window resize and on image load, since the
/// rendered rectangle changes with the natural image dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageViewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageViewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Map a pointer position in viewport pixels to normalized image
    /// coordinates, clamped to `[0,1]` on each axis.
    ///
    /// Returns `None` while the image has no rendered extent (not yet
    /// loaded), so callers never see NaN or infinite coordinates.
    pub fn normalize(&self, client_x: f32, client_y: f32) -> Option<NormPoint> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(NormPoint {
            x: ((client_x - self.left) / self.width).clamp(0.0, 1.0),
            y: ((client_y - self.top) / self.height).clamp(0.0, 1.0),
        })
    }

    /// Map a normalized point back to viewport pixels.
    pub fn denormalize(&self, p: NormPoint) -> (f32, f32) {
        (self.left + p.x * self.width, self.top + p.y * self.height)
    }

    /// Map a normalized rectangle to viewport pixels as
    /// `(left, top, width, height)`, for drawing overlays.
    pub fn rect_to_viewport(&self, r: &NormRect) -> (f32, f32, f32, f32) {
        (
            self.left + r.x * self.width,
            self.top + r.y * self.height,
            r.width * self.width,
            r.height * self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_to_unit_square() {
        let vp = ImageViewport::new(100.0, 50.0, 800.0, 400.0);
        let p = vp.normalize(500.0, 250.0).unwrap();
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);

        // Pointer outside the image rectangle clamps to the edge.
        let p = vp.normalize(0.0, 10_000.0).unwrap();
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 1.0);
    }

    #[test]
    fn normalize_rejects_unloaded_image() {
        let vp = ImageViewport::new(0.0, 0.0, 0.0, 0.0);
        assert!(vp.normalize(10.0, 10.0).is_none());
    }

    #[test]
    fn normalize_is_idempotent_for_same_layout() {
        let vp = ImageViewport::new(20.0, 30.0, 640.0, 480.0);
        assert_eq!(vp.normalize(321.0, 222.0), vp.normalize(321.0, 222.0));
    }

    #[test]
    fn from_drag_is_order_independent() {
        let a = NormPoint { x: 0.8, y: 0.2 };
        let b = NormPoint { x: 0.3, y: 0.7 };
        let r = NormRect::from_drag(a, b);
        assert_eq!(r, NormRect::from_drag(b, a));
        assert!((r.x - 0.3).abs() < 1e-6);
        assert!((r.y - 0.2).abs() < 1e-6);
        assert!((r.width - 0.5).abs() < 1e-6);
        assert!((r.height - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rect_round_trips_through_viewport() {
        let vp = ImageViewport::new(10.0, 10.0, 500.0, 200.0);
        let r = NormRect {
            x: 0.1,
            y: 0.25,
            width: 0.4,
            height: 0.5,
        };
        let (left, top, w, h) = vp.rect_to_viewport(&r);
        let back = vp.normalize(left, top).unwrap();
        assert!((back.x - r.x).abs() < 1e-5);
        assert!((back.y - r.y).abs() < 1e-5);
        assert!((w - 200.0).abs() < 1e-3);
        assert!((h - 100.0).abs() < 1e-3);
    }
}
