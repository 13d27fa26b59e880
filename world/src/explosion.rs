//! Cosmetic explosions left behind by destroyed and detonating enemies.

use tile_defence_core::{Command, EntityBase, UpdateContext, Updatable};

/// Short-lived cosmetic entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    base: EntityBase,
    lifetime: u64,
    expired: bool,
}

impl Explosion {
    /// Creates an explosion that expires `lifetime` ticks after its creation.
    #[must_use]
    pub const fn new(base: EntityBase, lifetime: u64) -> Self {
        Self {
            base,
            lifetime,
            expired: false,
        }
    }

    /// Positioned data of the explosion.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Reports whether the explosion has run its course.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }
}

impl Updatable for Explosion {
    fn on_update(&mut self, context: &mut UpdateContext<'_>, _out: &mut Vec<Command>) {
        let age = context.tick().saturating_sub(self.base.created_tick());
        if age >= self.lifetime {
            self.expired = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use tile_defence_core::{CollisionTable, EntityId, EntityView};

    #[test]
    fn expires_after_lifetime() {
        let base = EntityBase::new(10, 0.0, 0.0, 1.0, 1.0).expect("valid base");
        let mut explosion = Explosion::new(base, 3);

        for (tick, expired) in [(11, false), (12, false), (13, true)] {
            let views: [EntityView; 0] = [];
            let table = CollisionTable::new();
            let mut rng = StepRng::new(0, 0);
            let mut context =
                UpdateContext::new(EntityId::new(1), tick, 30, &views, &table, &mut rng);
            explosion.on_update(&mut context, &mut Vec::new());
            assert_eq!(explosion.is_expired(), expired, "tick {tick}");
        }
    }
}
