//! Rectangle overlap queries over entity collections.

use crate::{EntityBase, EntityView, Rect};

/// Anything occupying an axis-aligned footprint.
pub trait Bounded {
    /// Bounding box currently covered.
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Bounded for EntityBase {
    fn bounds(&self) -> Rect {
        EntityBase::bounds(self)
    }
}

impl Bounded for EntityView {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Returns every entity whose bounding box intersects `area`, preserving the
/// iteration order of `entities`.
pub fn overlapped<'a, T, I>(entities: I, area: Rect) -> Vec<&'a T>
where
    T: Bounded + 'a,
    I: IntoIterator<Item = &'a T>,
{
    entities
        .into_iter()
        .filter(|entity| entity.bounds().intersects(&area))
        .collect()
}
