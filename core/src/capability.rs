//! Capability traits entities mix in to take part in the simulation.
//!
//! A positioned entity carries an [`EntityBase`](crate::EntityBase) and then
//! implements only the capabilities it needs: [`Living`] for health,
//! [`Effect`] for acting on overlapping living entities, [`DestroyListener`]
//! for destruction side effects, and [`Updatable`] for per-tick behaviour.
//! Side effects never touch the field directly; they are expressed as
//! [`Command`] values the field applies once the current pass completes.

use rand::RngCore;

use crate::{Command, CollisionTable, EntityId, EntityKind, Rect, Tick};

/// Health value marking an entity as permanently destroyed.
pub const DESTROYED_HEALTH: i64 = i64::MIN;

/// Entity with health that can be damaged, healed and destroyed.
pub trait Living {
    /// Current health.
    fn health(&self) -> i64;

    /// Applies a signed health delta.
    fn do_effect(&mut self, value: i64);

    /// Forces the entity into the destroyed state.
    fn do_destroy(&mut self);

    /// Reports whether health reached zero or below.
    fn is_destroyed(&self) -> bool;

    /// Footprint of the entity when it occupies space on the map.
    fn footprint(&self) -> Option<Rect> {
        None
    }
}

/// Entity that acts on living entities it overlaps.
pub trait Effect {
    /// Applies the effect to `target`. Returning `false` stops the field from
    /// offering further targets to this source during the current pass.
    fn on_effect(&mut self, target: &mut dyn Living, out: &mut Vec<Command>) -> bool;
}

/// Entity that reacts to its own destruction.
pub trait DestroyListener {
    /// Invoked exactly once, when the field finalises the destruction.
    fn on_destroy(&mut self, out: &mut Vec<Command>);
}

/// Entity advanced once per tick.
pub trait Updatable {
    /// Advances the entity against the snapshot captured at tick start.
    fn on_update(&mut self, context: &mut UpdateContext<'_>, out: &mut Vec<Command>);
}

/// Immutable per-entity record captured at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    /// Identifier of the entity.
    pub id: EntityId,
    /// Concrete kind of the entity.
    pub kind: EntityKind,
    /// Footprint at tick start.
    pub bounds: Rect,
    /// Distance-to-goal carried by road tiles.
    pub road_distance: Option<f64>,
}

/// Read-only world state and the random source handed to updating entities.
pub struct UpdateContext<'a> {
    subject: EntityId,
    tick: Tick,
    ticks_per_second: u64,
    views: &'a [EntityView],
    collisions: &'a CollisionTable,
    rng: &'a mut dyn RngCore,
}

impl<'a> UpdateContext<'a> {
    /// Bundles the state visible to updating entities.
    pub fn new(
        subject: EntityId,
        tick: Tick,
        ticks_per_second: u64,
        views: &'a [EntityView],
        collisions: &'a CollisionTable,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            subject,
            tick,
            ticks_per_second,
            views,
            collisions,
            rng,
        }
    }

    /// Identifier of the entity being updated.
    #[must_use]
    pub fn subject(&self) -> EntityId {
        self.subject
    }

    /// Tick being simulated.
    #[must_use]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Number of ticks in one in-game second.
    #[must_use]
    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    /// Reports whether the current tick starts a new in-game second.
    #[must_use]
    pub fn is_second_boundary(&self) -> bool {
        self.ticks_per_second != 0 && self.tick % self.ticks_per_second == 0
    }

    /// Snapshot of every live entity, ordered by identifier.
    #[must_use]
    pub fn views(&self) -> &'a [EntityView] {
        self.views
    }

    /// Collision rules in force.
    #[must_use]
    pub fn collisions(&self) -> &'a CollisionTable {
        self.collisions
    }

    /// Injected random source.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}

impl std::fmt::Debug for UpdateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateContext")
            .field("subject", &self.subject)
            .field("tick", &self.tick)
            .field("ticks_per_second", &self.ticks_per_second)
            .field("views", &self.views.len())
            .finish_non_exhaustive()
    }
}

/// Health and armor shared by living entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vitals {
    health: i64,
    armor: i64,
}

impl Vitals {
    /// Creates vitals with the provided health and armor.
    #[must_use]
    pub const fn new(health: i64, armor: i64) -> Self {
        Self { health, armor }
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i64 {
        self.health
    }

    /// Armor threshold absorbing weak attacks.
    #[must_use]
    pub const fn armor(&self) -> i64 {
        self.armor
    }

    /// Reports whether the destroyed sentinel has been set.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.health == DESTROYED_HEALTH
    }

    /// Reports whether health reached zero or below.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Applies `value` unless the sentinel is set. Damage must exceed the
    /// armor to land; healing always lands.
    pub fn apply(&mut self, value: i64) {
        if self.is_consumed() {
            return;
        }
        if value < self.armor.saturating_neg() || value > 0 {
            self.health = self
                .health
                .saturating_add(value)
                .max(DESTROYED_HEALTH + 1);
        }
    }

    /// Removes health directly, ignoring armor. Has no effect once consumed.
    pub fn drain(&mut self, amount: i64) {
        if self.is_consumed() {
            return;
        }
        self.health = self
            .health
            .saturating_sub(amount)
            .max(DESTROYED_HEALTH + 1);
    }

    /// Sets the destroyed sentinel.
    pub fn destroy(&mut self) {
        self.health = DESTROYED_HEALTH;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_absorbs_weak_attacks() {
        let mut vitals = Vitals::new(100, 5);
        vitals.apply(-3);
        assert_eq!(vitals.health(), 100);
        vitals.apply(-5);
        assert_eq!(vitals.health(), 100);
        vitals.apply(-6);
        assert_eq!(vitals.health(), 94);
        vitals.apply(10);
        assert_eq!(vitals.health(), 104);
        vitals.apply(0);
        assert_eq!(vitals.health(), 104);
    }

    #[test]
    fn consumed_vitals_ignore_every_effect() {
        let mut vitals = Vitals::new(10, 0);
        vitals.destroy();
        for value in [-100, -1, 0, 1, 1_000, i64::MAX] {
            vitals.apply(value);
            vitals.drain(value);
            assert_eq!(vitals.health(), DESTROYED_HEALTH);
        }
        assert!(vitals.is_destroyed());
    }

    #[test]
    fn damage_to_zero_destroys_without_sentinel() {
        let mut vitals = Vitals::new(10, 0);
        vitals.apply(-10);
        assert!(vitals.is_destroyed());
        assert!(!vitals.is_consumed());
    }

    #[test]
    fn extreme_damage_never_reaches_the_sentinel() {
        let mut vitals = Vitals::new(10, 0);
        vitals.apply(i64::MIN + 1);
        assert!(vitals.is_destroyed());
        assert!(!vitals.is_consumed());
    }

    #[test]
    fn second_boundary_follows_ticks_per_second() {
        let views: [EntityView; 0] = [];
        let table = CollisionTable::new();
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let context = UpdateContext::new(EntityId::new(1), 60, 30, &views, &table, &mut rng);
        assert!(context.is_second_boundary());

        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let context = UpdateContext::new(EntityId::new(1), 61, 30, &views, &table, &mut rng);
        assert!(!context.is_second_boundary());

        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let context = UpdateContext::new(EntityId::new(1), 0, 0, &views, &table, &mut rng);
        assert!(!context.is_second_boundary());
    }
}
