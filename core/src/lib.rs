#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Defence simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative field, and pure systems. Adapters and entities submit
//! [`Command`] values describing desired mutations, the field executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for collaborators such as renderers and audio players to react to.
//! Entities advertise their behaviour through the capability traits
//! [`Living`], [`Effect`], [`DestroyListener`] and [`Updatable`], and every
//! spatial decision is made through [`overlap::overlapped`] together with the
//! kind-keyed [`CollisionTable`].

mod capability;
mod geometry;
pub mod overlap;
mod rules;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use capability::{
    DestroyListener, Effect, EntityView, Living, UpdateContext, Updatable, Vitals,
    DESTROYED_HEALTH,
};
pub use geometry::{EntityBase, GeometryError, Rect};
pub use rules::{
    CollisionRule, CollisionTable, EffectRule, EffectTable, SoundCue, SoundRule, SoundTable,
};

/// Discrete simulation step counter.
pub type Tick = u64;

/// Number of ticks that make up one in-game second unless configured otherwise.
pub const DEFAULT_TICKS_PER_SECOND: u64 = 30;

/// Side length of a single map tile measured in world units.
pub const TILE_SIZE: f64 = 1.0;

/// Unique identifier assigned to an entity by the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Flavours of mobile enemies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EnemyKind {
    /// Baseline enemy with balanced stats.
    Normal,
    /// Small, fast and fragile enemy.
    Smaller,
    /// Heavily armoured, slow enemy.
    Tanker,
    /// Rare enemy with very high health.
    Boss,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [EnemyKind; 4] = [Self::Normal, Self::Smaller, Self::Tanker, Self::Boss];
}

/// Types of towers that can be placed on the map.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TowerKind {
    /// General purpose tower.
    Normal,
    /// Long range, slow firing tower.
    Sniper,
    /// Short range, rapid firing tower.
    MachineGun,
    /// Tower that slows enemies and afflicts them with damage over time.
    Timer,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [TowerKind; 4] = [Self::Normal, Self::Sniper, Self::MachineGun, Self::Timer];
}

/// Concrete kind of an entity, used as the key of every rule table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EntityKind {
    /// Enemy of kind [`EnemyKind::Normal`].
    NormalEnemy,
    /// Enemy of kind [`EnemyKind::Smaller`].
    SmallerEnemy,
    /// Enemy of kind [`EnemyKind::Tanker`].
    TankerEnemy,
    /// Enemy of kind [`EnemyKind::Boss`].
    BossEnemy,
    /// Walkable tile carrying a distance-to-goal value.
    Road,
    /// Impassable obstacle tile.
    Mountain,
    /// Goal tile guarded by the player.
    Target,
    /// Tile that periodically releases enemies.
    Spawner,
    /// Tower of kind [`TowerKind::Normal`].
    NormalTower,
    /// Tower of kind [`TowerKind::Sniper`].
    SniperTower,
    /// Tower of kind [`TowerKind::MachineGun`].
    MachineGunTower,
    /// Tower of kind [`TowerKind::Timer`].
    TimerTower,
    /// Cosmetic explosion left behind by destroyed or detonating enemies.
    Explosion,
}

impl EntityKind {
    /// Every entity kind in declaration order.
    pub const ALL: [EntityKind; 13] = [
        Self::NormalEnemy,
        Self::SmallerEnemy,
        Self::TankerEnemy,
        Self::BossEnemy,
        Self::Road,
        Self::Mountain,
        Self::Target,
        Self::Spawner,
        Self::NormalTower,
        Self::SniperTower,
        Self::MachineGunTower,
        Self::TimerTower,
        Self::Explosion,
    ];

    /// Reports whether the kind describes a mobile enemy.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(
            self,
            Self::NormalEnemy | Self::SmallerEnemy | Self::TankerEnemy | Self::BossEnemy
        )
    }

    /// Reports whether the kind describes a tower.
    #[must_use]
    pub const fn is_tower(self) -> bool {
        matches!(
            self,
            Self::NormalTower | Self::SniperTower | Self::MachineGunTower | Self::TimerTower
        )
    }
}

impl From<EnemyKind> for EntityKind {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Normal => Self::NormalEnemy,
            EnemyKind::Smaller => Self::SmallerEnemy,
            EnemyKind::Tanker => Self::TankerEnemy,
            EnemyKind::Boss => Self::BossEnemy,
        }
    }
}

impl From<TowerKind> for EntityKind {
    fn from(kind: TowerKind) -> Self {
        match kind {
            TowerKind::Normal => Self::NormalTower,
            TowerKind::Sniper => Self::SniperTower,
            TowerKind::MachineGun => Self::MachineGunTower,
            TowerKind::Timer => Self::TimerTower,
        }
    }
}

/// Release schedule carried by a spawner tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPlan {
    /// Kind of enemy released by the spawner.
    pub enemy: EnemyKind,
    /// Ticks to wait after placement before the first release.
    pub initial_delay: u64,
    /// Ticks between successive releases.
    pub interval: u64,
    /// Total number of enemies to release.
    pub count: u32,
}

/// Description of an entity the field should create.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnRequest {
    /// Mobile enemy whose stats come from the field's rule book.
    Enemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
        /// Left edge of the enemy in world units.
        x: f64,
        /// Top edge of the enemy in world units.
        y: f64,
    },
    /// Road tile with a precomputed distance to the goal.
    Road {
        /// Left edge of the tile.
        x: f64,
        /// Top edge of the tile.
        y: f64,
        /// Walking cost from this tile to the goal.
        distance: f64,
    },
    /// Impassable mountain tile.
    Mountain {
        /// Left edge of the tile.
        x: f64,
        /// Top edge of the tile.
        y: f64,
    },
    /// Tower whose stats come from the field's rule book.
    Tower {
        /// Kind of tower to create.
        kind: TowerKind,
        /// Left edge of the tile.
        x: f64,
        /// Top edge of the tile.
        y: f64,
    },
    /// Goal tile defended by the player.
    Target {
        /// Left edge of the tile.
        x: f64,
        /// Top edge of the tile.
        y: f64,
        /// Health the target starts with.
        health: i64,
    },
    /// Tile releasing enemies according to a plan.
    Spawner {
        /// Left edge of the tile.
        x: f64,
        /// Top edge of the tile.
        y: f64,
        /// Release schedule.
        plan: SpawnPlan,
    },
    /// Cosmetic explosion covering the provided footprint.
    Explosion {
        /// Area covered by the explosion.
        bounds: Rect,
    },
}

impl SpawnRequest {
    /// Concrete kind of the entity the request produces.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Enemy { kind, .. } => EntityKind::from(*kind),
            Self::Road { .. } => EntityKind::Road,
            Self::Mountain { .. } => EntityKind::Mountain,
            Self::Tower { kind, .. } => EntityKind::from(*kind),
            Self::Target { .. } => EntityKind::Target,
            Self::Spawner { .. } => EntityKind::Spawner,
            Self::Explosion { .. } => EntityKind::Explosion,
        }
    }
}

/// Commands that express all permissible field mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick.
    Tick,
    /// Requests creation of a new entity.
    Spawn {
        /// Entity to create.
        request: SpawnRequest,
    },
    /// Applies a health delta to a living entity.
    ApplyEffect {
        /// Entity receiving the effect.
        target: EntityId,
        /// Signed health delta; negative values are damage.
        value: i64,
    },
    /// Slows an enemy and afflicts it with damage over time.
    ApplyTimerEffect {
        /// Enemy receiving the effect.
        target: EntityId,
    },
    /// Forces a living entity into the destroyed state.
    Destroy {
        /// Entity to destroy.
        target: EntityId,
    },
    /// Credits currency to the player.
    AwardCredit {
        /// Amount credited.
        amount: i64,
    },
    /// Requests the destruction sound associated with a kind.
    PlaySound {
        /// Kind whose sound should play.
        kind: EntityKind,
    },
    /// Requests that the player spend currency.
    SpendCredit {
        /// Amount to deduct.
        amount: i64,
    },
}

/// Events broadcast by the field after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick counter after advancing.
        tick: Tick,
    },
    /// Confirms that an entity was inserted into the field.
    EntitySpawned {
        /// Identifier allocated to the entity.
        id: EntityId,
        /// Concrete kind of the entity.
        kind: EntityKind,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Kind of the entity that was requested.
        kind: EntityKind,
        /// Specific reason the request failed.
        reason: SpawnError,
    },
    /// Reports that an effect source detonated on a living target.
    Detonated {
        /// Entity that detonated.
        source: EntityId,
        /// Entity that absorbed the detonation.
        target: EntityId,
    },
    /// Confirms that a destroyed entity was removed from the field.
    EntityDestroyed {
        /// Identifier of the removed entity.
        id: EntityId,
        /// Concrete kind of the removed entity.
        kind: EntityKind,
    },
    /// Reports a change of the player's currency.
    CreditChanged {
        /// Credit after the change.
        credit: i64,
        /// Signed amount that was applied.
        delta: i64,
    },
    /// Reports that a spend request exceeded the available credit.
    CreditSpendRejected {
        /// Amount that was requested.
        requested: i64,
        /// Credit available when the request was processed.
        available: i64,
    },
    /// Asks the audio collaborator to play a cue.
    SoundRequested {
        /// Kind the cue was looked up for.
        kind: EntityKind,
        /// Cue to play.
        cue: SoundCue,
    },
}

/// Reasons a spawn request may be rejected by the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested footprint has a non-positive or non-finite size.
    #[error("entity footprint must have a positive, finite size")]
    InvalidSize,
    /// The rule book carries no stats for the requested kind.
    #[error("no stats configured for {0:?}")]
    MissingStats(EntityKind),
}

impl From<GeometryError> for SpawnError {
    fn from(_: GeometryError) -> Self {
        Self::InvalidSize
    }
}
