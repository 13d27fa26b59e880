//! Stationary map tiles placed by the map-setup step.

use tile_defence_core::{
    Command, EntityBase, Living, Rect, SpawnPlan, SpawnRequest, UpdateContext, Updatable, Vitals,
};

/// Walkable tile carrying the precomputed walking cost to the goal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Road {
    base: EntityBase,
    distance: f64,
}

impl Road {
    /// Creates a road tile.
    #[must_use]
    pub const fn new(base: EntityBase, distance: f64) -> Self {
        Self { base, distance }
    }

    /// Positioned data of the tile.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Walking cost from this tile to the goal.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }
}

/// Impassable obstacle tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mountain {
    base: EntityBase,
}

impl Mountain {
    /// Creates a mountain tile.
    #[must_use]
    pub const fn new(base: EntityBase) -> Self {
        Self { base }
    }

    /// Positioned data of the tile.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }
}

/// Goal tile; enemies reaching it detonate on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    base: EntityBase,
    vitals: Vitals,
}

impl Target {
    /// Creates a target with the provided health and no armor.
    #[must_use]
    pub const fn new(base: EntityBase, health: i64) -> Self {
        Self {
            base,
            vitals: Vitals::new(health, 0),
        }
    }

    /// Positioned data of the tile.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }
}

impl Living for Target {
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

/// Tile releasing enemies on a fixed schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawner {
    base: EntityBase,
    plan: SpawnPlan,
    enemy_size: f64,
    released: u32,
}

impl Spawner {
    /// Creates a spawner. `enemy_size` is used to centre released enemies.
    #[must_use]
    pub const fn new(base: EntityBase, plan: SpawnPlan, enemy_size: f64) -> Self {
        Self {
            base,
            plan,
            enemy_size,
            released: 0,
        }
    }

    /// Positioned data of the tile.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Number of enemies released so far.
    #[must_use]
    pub const fn released(&self) -> u32 {
        self.released
    }

    /// Reports whether the whole plan has been released.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.released >= self.plan.count
    }

    fn is_due(&self, tick: u64) -> bool {
        let Some(elapsed) = tick
            .checked_sub(self.base.created_tick())
            .and_then(|age| age.checked_sub(self.plan.initial_delay))
        else {
            return false;
        };
        elapsed % self.plan.interval.max(1) == 0
    }
}

impl Updatable for Spawner {
    fn on_update(&mut self, context: &mut UpdateContext<'_>, out: &mut Vec<Command>) {
        if self.is_exhausted() || !self.is_due(context.tick()) {
            return;
        }

        let inset = (self.base.width() - self.enemy_size) * 0.5;
        out.push(Command::Spawn {
            request: SpawnRequest::Enemy {
                kind: self.plan.enemy,
                x: self.base.x() + inset,
                y: self.base.y() + inset,
            },
        });
        self.released += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use tile_defence_core::{CollisionTable, EnemyKind, EntityId, EntityView};

    #[test]
    fn target_absorbs_damage_until_destroyed() {
        let mut target = Target::new(tile(), 50);
        target.do_effect(-20);
        assert_eq!(target.health(), 30);
        target.do_effect(-30);
        assert!(target.is_destroyed());
        assert_eq!(target.footprint(), Some(Rect::new(2.0, 3.0, 1.0, 1.0)));
    }

    #[test]
    fn spawner_respects_delay_interval_and_count() {
        let plan = SpawnPlan {
            enemy: EnemyKind::Smaller,
            initial_delay: 2,
            interval: 3,
            count: 2,
        };
        let mut spawner = Spawner::new(tile(), plan, 0.5);
        let mut releases = Vec::new();

        for tick in 1..=12 {
            let mut out = Vec::new();
            update(&mut spawner, tick, &mut out);
            if !out.is_empty() {
                releases.push((tick, out));
            }
        }

        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].0, 2);
        assert_eq!(releases[1].0, 5);
        assert_eq!(
            releases[0].1,
            vec![Command::Spawn {
                request: SpawnRequest::Enemy {
                    kind: EnemyKind::Smaller,
                    x: 2.25,
                    y: 3.25,
                },
            }]
        );
        assert!(spawner.is_exhausted());
        assert_eq!(spawner.released(), 2);
    }

    fn update(spawner: &mut Spawner, tick: u64, out: &mut Vec<Command>) {
        let views: [EntityView; 0] = [];
        let table = CollisionTable::standard();
        let mut rng = StepRng::new(0, 0);
        let mut context = UpdateContext::new(EntityId::new(1), tick, 30, &views, &table, &mut rng);
        spawner.on_update(&mut context, out);
    }

    fn tile() -> EntityBase {
        EntityBase::new(0, 2.0, 3.0, 1.0, 1.0).expect("valid tile")
    }
}
