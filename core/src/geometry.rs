//! Axis-aligned rectangles and the positioned entity base.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Tick;

/// Axis-aligned rectangle expressed in world units.
///
/// `x`/`y` locate the top-left corner; the rectangle extends toward positive
/// coordinates by `width` and `height`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// AABB intersection test. Rectangles that merely touch along an edge or
    /// corner intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Area shared by both rectangles; zero when they only touch or are apart.
    #[must_use]
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let width = self.right().min(other.right()) - self.x.max(other.x);
        let height = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        width * height
    }

    /// Rectangle grown by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Rectangle of the same size moved so its corner sits at `(x, y)`.
    #[must_use]
    pub fn moved_to(&self, x: f64, y: f64) -> Rect {
        Rect::new(x, y, self.width, self.height)
    }
}

/// Reasons an entity footprint may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GeometryError {
    /// Width and height must both be strictly positive.
    #[error("entity size {width}x{height} must be strictly positive")]
    NonPositiveSize {
        /// Rejected width.
        width: f64,
        /// Rejected height.
        height: f64,
    },
    /// Position and size must be finite numbers.
    #[error("entity geometry must be finite")]
    NonFinite,
}

/// Positioned, sized and timestamped data shared by every entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityBase {
    created_tick: Tick,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl EntityBase {
    /// Creates a new entity base, validating its footprint.
    pub fn new(
        created_tick: Tick,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, GeometryError> {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(GeometryError::NonPositiveSize { width, height });
        }
        Ok(Self {
            created_tick,
            x,
            y,
            width,
            height,
        })
    }

    /// Creates an entity base covering the provided rectangle.
    pub fn covering(created_tick: Tick, bounds: Rect) -> Result<Self, GeometryError> {
        Self::new(
            created_tick,
            bounds.x(),
            bounds.y(),
            bounds.width(),
            bounds.height(),
        )
    }

    /// Tick at which the entity was created.
    #[must_use]
    pub const fn created_tick(&self) -> Tick {
        self.created_tick
    }

    /// Left edge in world units.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Top edge in world units.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Bounding box currently covered by the entity.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Moves the entity so its top-left corner sits at `(x, y)`.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_intersect_without_area() {
        let left = Rect::new(0.0, 0.0, 1.0, 1.0);
        let right = Rect::new(1.0, 0.0, 1.0, 1.0);
        assert!(left.intersects(&right));
        assert_eq!(left.overlap_area(&right), 0.0);
    }

    #[test]
    fn separated_rectangles_do_not_intersect() {
        let left = Rect::new(0.0, 0.0, 1.0, 1.0);
        let far = Rect::new(1.5, 0.0, 1.0, 1.0);
        assert!(!left.intersects(&far));
        assert!(!far.intersects(&left));
    }

    #[test]
    fn overlap_area_matches_shared_region() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(1.5, 1.0, 2.0, 2.0);
        assert!((a.overlap_area(&b) - 0.5).abs() < 1e-12);
        assert!((b.overlap_area(&a) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn expanded_grows_every_side() {
        let grown = Rect::new(1.0, 1.0, 1.0, 1.0).expanded(0.5);
        assert_eq!(grown, Rect::new(0.5, 0.5, 2.0, 2.0));
    }

    #[test]
    fn entity_base_rejects_degenerate_sizes() {
        assert_eq!(
            EntityBase::new(0, 0.0, 0.0, 0.0, 1.0),
            Err(GeometryError::NonPositiveSize {
                width: 0.0,
                height: 1.0
            })
        );
        assert_eq!(
            EntityBase::new(0, f64::NAN, 0.0, 1.0, 1.0),
            Err(GeometryError::NonFinite)
        );
    }

    #[test]
    fn entity_base_keeps_fractional_positions() {
        let mut base = EntityBase::new(3, 0.25, 0.5, 0.9, 0.9).expect("valid base");
        base.set_position(1.125, 2.0625);
        assert_eq!(base.bounds(), Rect::new(1.125, 2.0625, 0.9, 0.9));
        assert_eq!(base.created_tick(), 3);
    }
}
