//! Mobile enemies: movement, damage over time, detonation and rewards.

use tile_defence_core::{
    Command, DestroyListener, Effect, EnemyKind, EntityBase, EntityKind, EntityView, Living, Rect,
    SpawnRequest, UpdateContext, Updatable, Vitals,
};
use tile_defence_system_movement::{Movement, MIN_ROAD_WEIGHT, TIE_BREAK_THRESHOLD};

use crate::config::EnemyStats;

const MOVEMENT: Movement = Movement::new(TIE_BREAK_THRESHOLD, MIN_ROAD_WEIGHT);

/// Fraction of current health lost per in-game second while afflicted.
const DECAY_FRACTION: f64 = 0.1;

/// Speed multiplier applied by each timer effect.
const SLOW_FACTOR: f64 = 0.8;

/// Fraction of the spawn speed an enemy keeps under repeated timer effects.
pub(crate) const DEFAULT_SLOW_FLOOR: f64 = 0.5;

/// Enemy walking the road toward the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    base: EntityBase,
    kind: EnemyKind,
    vitals: Vitals,
    speed: f64,
    min_speed: f64,
    reward: i64,
    bad_effect: bool,
}

impl Enemy {
    /// Creates an enemy from explicit stats.
    #[must_use]
    pub fn new(
        base: EntityBase,
        kind: EnemyKind,
        health: i64,
        armor: i64,
        speed: f64,
        reward: i64,
    ) -> Self {
        Self {
            base,
            kind,
            vitals: Vitals::new(health, armor),
            speed,
            min_speed: speed * DEFAULT_SLOW_FLOOR,
            reward,
            bad_effect: false,
        }
    }

    /// Creates an enemy from a rule book entry.
    #[must_use]
    pub fn from_stats(base: EntityBase, stats: &EnemyStats) -> Self {
        Self::new(
            base,
            stats.kind,
            stats.health,
            stats.armor,
            stats.speed,
            stats.reward,
        )
        .with_slow_floor(stats.slow_floor)
    }

    /// Sets the fraction of the current speed that timer effects never go
    /// below.
    #[must_use]
    pub fn with_slow_floor(mut self, fraction: f64) -> Self {
        self.min_speed = self.speed * fraction.clamp(0.0, 1.0);
        self
    }

    /// Positioned data of the enemy.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Kind of the enemy.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Armor threshold.
    #[must_use]
    pub const fn armor(&self) -> i64 {
        self.vitals.armor()
    }

    /// Current per-tick movement budget.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Credit paid on destruction.
    #[must_use]
    pub const fn reward(&self) -> i64 {
        self.reward
    }

    /// Whether health decays every in-game second.
    #[must_use]
    pub const fn has_bad_effect(&self) -> bool {
        self.bad_effect
    }

    /// Turns damage over time on or off.
    pub fn set_bad_effect(&mut self, bad_effect: bool) {
        self.bad_effect = bad_effect;
    }

    /// Slows the enemy and afflicts it with damage over time. The speed
    /// never drops below the slow floor fixed at creation.
    pub fn do_timer_effect(&mut self) {
        self.speed = (self.speed * SLOW_FACTOR).max(self.min_speed);
        self.bad_effect = true;
    }

    fn decay(&mut self) {
        let loss = (self.vitals.health() as f64 * DECAY_FRACTION).round() as i64;
        self.vitals.drain(loss);
    }
}

impl Living for Enemy {
    fn health(&self) -> i64 {
        self.vitals.health()
    }

    fn do_effect(&mut self, value: i64) {
        self.vitals.apply(value);
    }

    fn do_destroy(&mut self) {
        self.vitals.destroy();
    }

    fn is_destroyed(&self) -> bool {
        self.vitals.is_destroyed()
    }

    fn footprint(&self) -> Option<Rect> {
        Some(self.base.bounds())
    }
}

impl Effect for Enemy {
    fn on_effect(&mut self, target: &mut dyn Living, out: &mut Vec<Command>) -> bool {
        target.do_effect(self.vitals.health().saturating_neg());
        self.vitals.destroy();
        if let Some(bounds) = target.footprint() {
            out.push(Command::Spawn {
                request: SpawnRequest::Explosion { bounds },
            });
        }
        false
    }
}

impl DestroyListener for Enemy {
    fn on_destroy(&mut self, out: &mut Vec<Command>) {
        out.push(Command::AwardCredit {
            amount: self.reward,
        });
        out.push(Command::PlaySound {
            kind: EntityKind::from(self.kind),
        });
        out.push(Command::Spawn {
            request: SpawnRequest::Explosion {
                bounds: self.base.bounds(),
            },
        });
    }
}

impl Updatable for Enemy {
    fn on_update(&mut self, context: &mut UpdateContext<'_>, _out: &mut Vec<Command>) {
        if self.vitals.is_destroyed() {
            return;
        }

        let mover = EntityView {
            id: context.subject(),
            kind: EntityKind::from(self.kind),
            bounds: self.base.bounds(),
            road_distance: None,
        };
        let views = context.views();
        let collisions = context.collisions();
        if let Some((x, y)) = MOVEMENT.plan_step(&mover, self.speed, views, collisions, context.rng())
        {
            self.base.set_position(x, y);
        }

        if self.bad_effect && context.is_second_boundary() {
            self.decay();
        }
    }
}
