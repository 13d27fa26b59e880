#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy distance-descent movement for mobile entities.
//!
//! Each tick a mover samples 32 candidate positions (eight unit directions at
//! four doubling magnitudes up to its speed) and scores each one by the
//! area-weighted mean of the road distances it would cover. Candidates that
//! overlap a collidable entity, or that cover no road at all, score NaN and
//! therefore never win a comparison. The lowest score is committed; exact ties
//! are broken by a draw from the injected random source.

use rand::Rng;
use tile_defence_core::{overlap::overlapped, CollisionTable, EntityView, Rect};
use tracing::trace;

/// Number of doubling magnitudes sampled, from `speed / 8` up to `speed`.
pub const SPEED_LEVELS: u32 = 4;

/// A tied candidate replaces the current best when a uniform draw exceeds this.
pub const TIE_BREAK_THRESHOLD: f64 = 0.8;

/// Total overlapped road area below which a candidate has no usable road data.
pub const MIN_ROAD_WEIGHT: f64 = 1e-9;

const DIAGONAL: f64 = std::f64::consts::FRAC_1_SQRT_2;

const DIRECTIONS: [(f64, f64); 8] = [
    (0.0, -1.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-DIAGONAL, -DIAGONAL),
    (DIAGONAL, DIAGONAL),
    (DIAGONAL, -DIAGONAL),
    (-DIAGONAL, DIAGONAL),
];

/// Local-search planner choosing the next position of a mover.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    tie_break_threshold: f64,
    min_road_weight: f64,
}

impl Movement {
    /// Creates a planner using the provided tie-break threshold and minimum
    /// road weight.
    #[must_use]
    pub const fn new(tie_break_threshold: f64, min_road_weight: f64) -> Self {
        Self {
            tie_break_threshold,
            min_road_weight,
        }
    }

    /// Chooses where `mover` should stand after this tick.
    ///
    /// Returns `None` when no candidate produced a real score, in which case
    /// the mover stays put.
    pub fn plan_step<R>(
        &self,
        mover: &EntityView,
        speed: f64,
        views: &[EntityView],
        collisions: &CollisionTable,
        rng: &mut R,
    ) -> Option<(f64, f64)>
    where
        R: Rng + ?Sized,
    {
        if !(speed.is_finite() && speed > 0.0) {
            return None;
        }

        let origin = mover.bounds;
        let nearby = overlapped(views, origin.expanded(speed));
        let mut best: Option<Candidate> = None;
        let mut minimum = f64::MAX;
        let mut magnitude = speed * 0.125;

        for _ in 0..SPEED_LEVELS {
            for (dx, dy) in DIRECTIONS {
                let x = origin.x() + dx * magnitude;
                let y = origin.y() + dy * magnitude;
                let score = self.score(&nearby, mover, origin.moved_to(x, y), collisions);
                if score < minimum
                    || (score == minimum && rng.gen::<f64>() > self.tie_break_threshold)
                {
                    minimum = score;
                    best = Some(Candidate { x, y });
                }
            }
            magnitude += magnitude;
        }

        if best.is_none() {
            trace!(id = mover.id.get(), "no candidate position improved; mover stays");
        }
        best.map(|candidate| (candidate.x, candidate.y))
    }

    /// Area-weighted mean road distance covered by `area`, or NaN when `area`
    /// overlaps something `mover` collides with or covers no road.
    #[must_use]
    pub fn score(
        &self,
        nearby: &[&EntityView],
        mover: &EntityView,
        area: Rect,
        collisions: &CollisionTable,
    ) -> f64 {
        let mut weighted = 0.0;
        let mut weight = 0.0;

        for view in overlapped(nearby.iter().copied(), area) {
            if view.id == mover.id {
                continue;
            }
            if collisions.collidable(mover.kind, view.kind) {
                return f64::NAN;
            }
            if let Some(distance) = view.road_distance {
                let covered = area.overlap_area(&view.bounds);
                weighted += covered * distance;
                weight += covered;
            }
        }

        if weight < self.min_road_weight {
            return f64::NAN;
        }
        weighted / weight
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(TIE_BREAK_THRESHOLD, MIN_ROAD_WEIGHT)
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    x: f64,
    y: f64,
}
