#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns tower readiness and tick snapshots into effect
//! commands.

use serde::{Deserialize, Serialize};
use tile_defence_core::{overlap::overlapped, Command, EntityId, EntityView, Rect, TowerKind};

/// Combat parameters of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Kind the stats belong to.
    pub kind: TowerKind,
    /// Reach measured from the tower centre to enemy centres, in tiles.
    pub range: f64,
    /// Health removed from the struck enemy. Ignored by timer towers.
    pub damage: i64,
    /// Ticks between two volleys.
    pub reload_ticks: u64,
}

impl TowerStats {
    /// Default stats for every tower kind.
    #[must_use]
    pub fn standard() -> Vec<TowerStats> {
        vec![
            Self {
                kind: TowerKind::Normal,
                range: 4.0,
                damage: 25,
                reload_ticks: 15,
            },
            Self {
                kind: TowerKind::Sniper,
                range: 8.0,
                damage: 120,
                reload_ticks: 45,
            },
            Self {
                kind: TowerKind::MachineGun,
                range: 3.0,
                damage: 8,
                reload_ticks: 3,
            },
            Self {
                kind: TowerKind::Timer,
                range: 3.0,
                damage: 0,
                reload_ticks: 30,
            },
        ]
    }
}

/// Countdown gating how often a tower may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reload {
    period: u64,
    remaining: u64,
}

impl Reload {
    /// Creates a countdown that is ready on its first tick.
    #[must_use]
    pub const fn new(period: u64) -> Self {
        Self {
            period,
            remaining: 0,
        }
    }

    /// Ticks left before the tower may fire again.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Advances the countdown by one tick and reports whether firing is
    /// allowed now.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        self.remaining == 0
    }

    /// Restarts the countdown after firing.
    pub fn restart(&mut self) {
        self.remaining = self.period;
    }
}

/// Tower combat system that queues effect commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Candidate>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the commands for one volley of a tower standing on `bounds`.
    ///
    /// Damage towers strike the enemy nearest to their centre; timer towers
    /// afflict every enemy in range. Returns whether anything was targeted, so
    /// that an idle tower keeps its reload ready.
    pub fn fire(
        &mut self,
        stats: &TowerStats,
        bounds: Rect,
        views: &[EntityView],
        out: &mut Vec<Command>,
    ) -> bool {
        self.collect_in_range(bounds, stats.range, views);
        if self.scratch.is_empty() {
            return false;
        }

        match stats.kind {
            TowerKind::Timer => {
                out.reserve(self.scratch.len());
                for candidate in &self.scratch {
                    out.push(Command::ApplyTimerEffect {
                        target: candidate.id,
                    });
                }
            }
            TowerKind::Normal | TowerKind::Sniper | TowerKind::MachineGun => {
                if let Some(nearest) = self.nearest() {
                    out.push(Command::ApplyEffect {
                        target: nearest,
                        value: stats.damage.saturating_neg(),
                    });
                }
            }
        }
        true
    }

    /// Enemy nearest to the centre of `bounds` within `range`; ties go to the
    /// lowest identifier.
    #[must_use]
    pub fn nearest_in_range(
        &mut self,
        bounds: Rect,
        range: f64,
        views: &[EntityView],
    ) -> Option<EntityId> {
        self.collect_in_range(bounds, range, views);
        self.nearest()
    }

    fn collect_in_range(&mut self, bounds: Rect, range: f64, views: &[EntityView]) {
        self.scratch.clear();
        if !(range.is_finite() && range >= 0.0) {
            return;
        }

        let (cx, cy) = bounds.center();
        let reach_sq = range * range;
        for view in overlapped(views, bounds.expanded(range)) {
            if !view.kind.is_enemy() {
                continue;
            }
            let (ex, ey) = view.bounds.center();
            let distance_sq = (ex - cx) * (ex - cx) + (ey - cy) * (ey - cy);
            if distance_sq > reach_sq {
                continue;
            }
            self.scratch.push(Candidate {
                id: view.id,
                distance_sq,
            });
        }
    }

    fn nearest(&self) -> Option<EntityId> {
        let mut best: Option<&Candidate> = None;
        for candidate in &self.scratch {
            match best {
                Some(existing) if !candidate.precedes(existing) => {}
                _ => best = Some(candidate),
            }
        }
        best.map(|candidate| candidate.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EntityId,
    distance_sq: f64,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.id < other.id
    }
}
