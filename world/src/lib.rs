#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative field state management for Tile Defence.
//!
//! The [`Field`] owns every live entity, the tick counter and the player's
//! credit. All mutation goes through [`apply`]. A [`Command::Tick`] runs the
//! per-tick pipeline:
//!
//! 1. capture a snapshot of every live entity,
//! 2. update each updatable entity once, in identifier order, against that
//!    snapshot,
//! 3. let effect sources act on the living entities they overlap,
//! 4. reap destroyed entities, notifying destroy listeners exactly once.
//!
//! Commands produced by entities during a pass are buffered and applied only
//! after the pass, so spawning never disturbs the iteration in progress.

mod config;
mod enemy;
mod explosion;
mod tiles;
mod tower;

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tile_defence_core::{
    overlap::overlapped, Command, DestroyListener, Effect, EntityBase, EntityId, EntityKind,
    EntityView, Event, Living, SpawnError, SpawnRequest, Tick, UpdateContext, Updatable,
    TILE_SIZE,
};
use tracing::{debug, info, warn};

pub use config::{ConfigError, EnemyStats, RuleBook};
pub use enemy::Enemy;
pub use explosion::Explosion;
pub use tiles::{Mountain, Road, Spawner, Target};
pub use tower::Tower;

/// Any entity that can live on the field.
#[derive(Debug)]
pub enum Entity {
    /// Mobile enemy.
    Enemy(Enemy),
    /// Road tile.
    Road(Road),
    /// Mountain tile.
    Mountain(Mountain),
    /// Tower.
    Tower(Tower),
    /// Goal tile.
    Target(Target),
    /// Enemy spawner tile.
    Spawner(Spawner),
    /// Cosmetic explosion.
    Explosion(Explosion),
}

impl Entity {
    /// Concrete kind of the entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Enemy(enemy) => EntityKind::from(enemy.kind()),
            Self::Road(_) => EntityKind::Road,
            Self::Mountain(_) => EntityKind::Mountain,
            Self::Tower(tower) => EntityKind::from(tower.stats().kind),
            Self::Target(_) => EntityKind::Target,
            Self::Spawner(_) => EntityKind::Spawner,
            Self::Explosion(_) => EntityKind::Explosion,
        }
    }

    /// Positioned data shared by every entity.
    #[must_use]
    pub fn base(&self) -> &EntityBase {
        match self {
            Self::Enemy(enemy) => enemy.base(),
            Self::Road(road) => road.base(),
            Self::Mountain(mountain) => mountain.base(),
            Self::Tower(tower) => tower.base(),
            Self::Target(target) => target.base(),
            Self::Spawner(spawner) => spawner.base(),
            Self::Explosion(explosion) => explosion.base(),
        }
    }

    /// Reports whether the entity is due to be reaped.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        match self {
            Self::Enemy(enemy) => enemy.is_destroyed(),
            Self::Target(target) => target.is_destroyed(),
            Self::Spawner(spawner) => spawner.is_exhausted(),
            Self::Explosion(explosion) => explosion.is_expired(),
            Self::Road(_) | Self::Mountain(_) | Self::Tower(_) => false,
        }
    }

    /// Distance-to-goal when the entity is a road tile.
    #[must_use]
    pub fn road_distance(&self) -> Option<f64> {
        match self {
            Self::Road(road) => Some(road.distance()),
            _ => None,
        }
    }

    /// Enemy data when the entity is an enemy.
    #[must_use]
    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Health capability.
    #[must_use]
    pub fn as_living(&self) -> Option<&dyn Living> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            Self::Target(target) => Some(target),
            _ => None,
        }
    }

    fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    fn as_living_mut(&mut self) -> Option<&mut dyn Living> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            Self::Target(target) => Some(target),
            _ => None,
        }
    }

    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            Self::Tower(tower) => Some(tower),
            Self::Spawner(spawner) => Some(spawner),
            Self::Explosion(explosion) => Some(explosion),
            Self::Road(_) | Self::Mountain(_) | Self::Target(_) => None,
        }
    }

    fn as_effect_mut(&mut self) -> Option<&mut dyn Effect> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    fn as_destroy_listener_mut(&mut self) -> Option<&mut dyn DestroyListener> {
        match self {
            Self::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    fn view(&self, id: EntityId) -> EntityView {
        EntityView {
            id,
            kind: self.kind(),
            bounds: self.base().bounds(),
            road_distance: self.road_distance(),
        }
    }
}

/// Represents the authoritative Tile Defence field state.
#[derive(Debug)]
pub struct Field {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
    tick_count: Tick,
    credit: i64,
    target_placed: bool,
    rules: RuleBook,
    rng: ChaCha8Rng,
}

impl Field {
    /// Creates an empty field governed by `rules`, with the tie-break random
    /// source seeded from `seed`.
    #[must_use]
    pub fn new(rules: RuleBook, seed: u64) -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 0,
            tick_count: 0,
            credit: rules.starting_credit,
            target_placed: false,
            rules,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn spawn(&mut self, request: SpawnRequest, out_events: &mut Vec<Event>) -> Option<EntityId> {
        let kind = request.kind();
        let entity = match self.build(request) {
            Ok(entity) => entity,
            Err(reason) => {
                warn!(?kind, %reason, "spawn rejected");
                out_events.push(Event::SpawnRejected { kind, reason });
                return None;
            }
        };

        if !self.rules.collisions.knows(kind) {
            warn!(?kind, "kind has no collision rules; it will collide with nothing");
        }
        if kind == EntityKind::Target {
            self.target_placed = true;
        }

        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let _ = self.entities.insert(id, entity);
        out_events.push(Event::EntitySpawned { id, kind });
        Some(id)
    }

    fn build(&self, request: SpawnRequest) -> Result<Entity, SpawnError> {
        let tick = self.tick_count;
        let tile = |x: f64, y: f64| EntityBase::new(tick, x, y, TILE_SIZE, TILE_SIZE);

        let entity = match request {
            SpawnRequest::Enemy { kind, x, y } => {
                let stats = self
                    .rules
                    .enemy(kind)
                    .ok_or(SpawnError::MissingStats(EntityKind::from(kind)))?;
                let base = EntityBase::new(tick, x, y, stats.size, stats.size)?;
                Entity::Enemy(Enemy::from_stats(base, stats))
            }
            SpawnRequest::Road { x, y, distance } => Entity::Road(Road::new(tile(x, y)?, distance)),
            SpawnRequest::Mountain { x, y } => Entity::Mountain(Mountain::new(tile(x, y)?)),
            SpawnRequest::Tower { kind, x, y } => {
                let stats = self
                    .rules
                    .tower(kind)
                    .ok_or(SpawnError::MissingStats(EntityKind::from(kind)))?;
                Entity::Tower(Tower::new(tile(x, y)?, *stats))
            }
            SpawnRequest::Target { x, y, health } => {
                Entity::Target(Target::new(tile(x, y)?, health))
            }
            SpawnRequest::Spawner { x, y, plan } => {
                let stats = self
                    .rules
                    .enemy(plan.enemy)
                    .ok_or(SpawnError::MissingStats(EntityKind::from(plan.enemy)))?;
                Entity::Spawner(Spawner::new(tile(x, y)?, plan, stats.size))
            }
            SpawnRequest::Explosion { bounds } => Entity::Explosion(Explosion::new(
                EntityBase::covering(tick, bounds)?,
                self.rules.explosion_lifetime_ticks,
            )),
        };
        Ok(entity)
    }

    fn snapshot(&self) -> Vec<EntityView> {
        self.entities
            .iter()
            .filter(|(_, entity)| !entity.is_destroyed())
            .map(|(id, entity)| entity.view(*id))
            .collect()
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        self.tick_count = self.tick_count.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_count,
        });

        let mut deferred = Vec::new();
        let views = self.snapshot();
        self.run_updates(&views, &mut deferred);
        self.flush(&mut deferred, out_events);

        self.run_effects(&views, &mut deferred, out_events);
        self.flush(&mut deferred, out_events);

        self.reap(&mut deferred, out_events);
        self.flush(&mut deferred, out_events);
    }

    fn run_updates(&mut self, views: &[EntityView], deferred: &mut Vec<Command>) {
        for view in views {
            let Some(entity) = self.entities.get_mut(&view.id) else {
                continue;
            };
            if entity.is_destroyed() {
                continue;
            }
            let Some(updatable) = entity.as_updatable_mut() else {
                continue;
            };
            let mut context = UpdateContext::new(
                view.id,
                self.tick_count,
                self.rules.ticks_per_second,
                views,
                &self.rules.collisions,
                &mut self.rng,
            );
            updatable.on_update(&mut context, deferred);
        }
    }

    fn run_effects(
        &mut self,
        views: &[EntityView],
        deferred: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        let current = self.snapshot();
        for view in views {
            let Some(mut source) = self.entities.remove(&view.id) else {
                continue;
            };
            let source_kind = source.kind();
            let source_bounds = source.base().bounds();

            if !source.is_destroyed() {
                if let Some(effect) = source.as_effect_mut() {
                    for candidate in overlapped(&current, source_bounds) {
                        if candidate.id == view.id
                            || !self.rules.effects.affects(source_kind, candidate.kind)
                        {
                            continue;
                        }
                        let Some(target) = self
                            .entities
                            .get_mut(&candidate.id)
                            .and_then(Entity::as_living_mut)
                        else {
                            continue;
                        };
                        if target.is_destroyed() {
                            continue;
                        }

                        let keep_going = effect.on_effect(target, deferred);
                        debug!(
                            source = view.id.get(),
                            target = candidate.id.get(),
                            "effect applied"
                        );
                        out_events.push(Event::Detonated {
                            source: view.id,
                            target: candidate.id,
                        });
                        if !keep_going {
                            break;
                        }
                    }
                }
            }

            let _ = self.entities.insert(view.id, source);
        }
    }

    fn reap(&mut self, deferred: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        let destroyed: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.is_destroyed())
            .map(|(id, _)| *id)
            .collect();

        for id in destroyed {
            let Some(mut entity) = self.entities.remove(&id) else {
                continue;
            };
            let kind = entity.kind();
            if let Some(listener) = entity.as_destroy_listener_mut() {
                listener.on_destroy(deferred);
            }
            if kind == EntityKind::Target {
                info!(id = id.get(), tick = self.tick_count, "target destroyed");
            }
            out_events.push(Event::EntityDestroyed { id, kind });
        }
    }

    fn flush(&mut self, deferred: &mut Vec<Command>, out_events: &mut Vec<Event>) {
        for command in std::mem::take(deferred) {
            apply(self, command, out_events);
        }
    }

    fn award(&mut self, amount: i64, out_events: &mut Vec<Event>) {
        self.credit = self.credit.saturating_add(amount);
        out_events.push(Event::CreditChanged {
            credit: self.credit,
            delta: amount,
        });
    }

    fn request_sound(&self, kind: EntityKind, out_events: &mut Vec<Event>) {
        if !self.rules.sfx {
            return;
        }
        match self.rules.sounds.cue(kind) {
            Some(cue) => out_events.push(Event::SoundRequested {
                kind,
                cue: cue.clone(),
            }),
            None => debug!(?kind, "no sound cue registered"),
        }
    }
}

/// Applies the provided command to the field, mutating state deterministically.
pub fn apply(field: &mut Field, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => field.advance(out_events),
        Command::Spawn { request } => {
            let _ = field.spawn(request, out_events);
        }
        Command::ApplyEffect { target, value } => {
            if let Some(living) = field
                .entities
                .get_mut(&target)
                .and_then(Entity::as_living_mut)
            {
                living.do_effect(value);
            }
        }
        Command::ApplyTimerEffect { target } => {
            if let Some(enemy) = field.entities.get_mut(&target).and_then(Entity::as_enemy_mut) {
                if !enemy.is_destroyed() {
                    enemy.do_timer_effect();
                }
            }
        }
        Command::Destroy { target } => {
            if let Some(living) = field
                .entities
                .get_mut(&target)
                .and_then(Entity::as_living_mut)
            {
                living.do_destroy();
            }
        }
        Command::AwardCredit { amount } => field.award(amount, out_events),
        Command::PlaySound { kind } => field.request_sound(kind, out_events),
        Command::SpendCredit { amount } => {
            if amount < 0 || amount > field.credit {
                out_events.push(Event::CreditSpendRejected {
                    requested: amount,
                    available: field.credit,
                });
            } else {
                field.award(amount.saturating_neg(), out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the field state.
pub mod query {
    use tile_defence_core::{overlap, EntityId, EntityKind, EntityView, Rect, Tick};

    use super::{Entity, Field, RuleBook};

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick_count(field: &Field) -> Tick {
        field.tick_count
    }

    /// Player currency.
    #[must_use]
    pub fn credit(field: &Field) -> i64 {
        field.credit
    }

    /// Rules the field was created with.
    #[must_use]
    pub fn rules(field: &Field) -> &RuleBook {
        &field.rules
    }

    /// Looks up a single entity.
    #[must_use]
    pub fn entity(field: &Field, id: EntityId) -> Option<&Entity> {
        field.entities.get(&id)
    }

    /// Iterates every entity in identifier order.
    pub fn entities(field: &Field) -> impl Iterator<Item = (EntityId, &Entity)> {
        field.entities.iter().map(|(id, entity)| (*id, entity))
    }

    /// Captures a view of every entity, destroyed or not, in identifier order.
    #[must_use]
    pub fn entity_views(field: &Field) -> Vec<EntityView> {
        field
            .entities
            .iter()
            .map(|(id, entity)| entity.view(*id))
            .collect()
    }

    /// Views of every entity whose bounding box intersects `area`.
    #[must_use]
    pub fn overlapped(field: &Field, area: Rect) -> Vec<EntityView> {
        let views = entity_views(field);
        overlap::overlapped(&views, area).into_iter().copied().collect()
    }

    /// Number of live entities of the provided kind.
    #[must_use]
    pub fn count(field: &Field, kind: EntityKind) -> usize {
        field
            .entities
            .values()
            .filter(|entity| entity.kind() == kind && !entity.is_destroyed())
            .count()
    }

    /// Number of live enemies of any kind.
    #[must_use]
    pub fn enemy_count(field: &Field) -> usize {
        field
            .entities
            .values()
            .filter(|entity| entity.kind().is_enemy() && !entity.is_destroyed())
            .count()
    }

    /// Reports whether a target was placed and none survives.
    #[must_use]
    pub fn is_defeated(field: &Field) -> bool {
        field.target_placed && count(field, EntityKind::Target) == 0
    }
}
