//! Towers placed on the map, firing at enemies through the combat system.

use tile_defence_core::{Command, EntityBase, UpdateContext, Updatable};
use tile_defence_system_tower_combat::{Reload, TowerCombat, TowerStats};

/// Stationary tower that fires whenever its reload allows and an enemy is in
/// range.
#[derive(Debug)]
pub struct Tower {
    base: EntityBase,
    stats: TowerStats,
    reload: Reload,
    combat: TowerCombat,
}

impl Tower {
    /// Creates a tower that is ready to fire on its first update.
    #[must_use]
    pub fn new(base: EntityBase, stats: TowerStats) -> Self {
        Self {
            base,
            stats,
            reload: Reload::new(stats.reload_ticks),
            combat: TowerCombat::new(),
        }
    }

    /// Positioned data of the tower.
    #[must_use]
    pub const fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Combat stats of the tower.
    #[must_use]
    pub const fn stats(&self) -> &TowerStats {
        &self.stats
    }

    /// Ticks left before the next volley may fire.
    #[must_use]
    pub const fn ready_in(&self) -> u64 {
        self.reload.remaining()
    }
}

impl Updatable for Tower {
    fn on_update(&mut self, context: &mut UpdateContext<'_>, out: &mut Vec<Command>) {
        if !self.reload.tick() {
            return;
        }
        if self
            .combat
            .fire(&self.stats, self.base.bounds(), context.views(), out)
        {
            self.reload.restart();
        }
    }
}
