//! Rule book describing entity stats and kind-keyed rule tables.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tile_defence_core::{
    CollisionTable, EffectTable, EnemyKind, SoundTable, TowerKind, DEFAULT_TICKS_PER_SECOND,
};
use tile_defence_system_tower_combat::TowerStats;

use crate::enemy::DEFAULT_SLOW_FLOOR;

/// Stats applied to every enemy of a kind when it is spawned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Kind the stats belong to.
    pub kind: EnemyKind,
    /// Side length of the square footprint, in tiles.
    pub size: f64,
    /// Starting health.
    pub health: i64,
    /// Damage at or below this value is absorbed.
    pub armor: i64,
    /// Distance covered per tick, in tiles.
    pub speed: f64,
    /// Credit paid when the enemy is destroyed.
    pub reward: i64,
    /// Fraction of the spawn speed below which timer effects stop slowing.
    #[serde(default = "default_slow_floor")]
    pub slow_floor: f64,
}

fn default_slow_floor() -> f64 {
    DEFAULT_SLOW_FLOOR
}

impl EnemyStats {
    /// Default stats for every enemy kind.
    #[must_use]
    pub fn standard() -> Vec<EnemyStats> {
        vec![
            Self {
                kind: EnemyKind::Normal,
                size: 0.9,
                health: 200,
                armor: 3,
                speed: 0.06,
                reward: 20,
                slow_floor: DEFAULT_SLOW_FLOOR,
            },
            Self {
                kind: EnemyKind::Smaller,
                size: 0.7,
                health: 100,
                armor: 0,
                speed: 0.1,
                reward: 10,
                slow_floor: DEFAULT_SLOW_FLOOR,
            },
            Self {
                kind: EnemyKind::Tanker,
                size: 0.9,
                health: 600,
                armor: 10,
                speed: 0.04,
                reward: 40,
                slow_floor: DEFAULT_SLOW_FLOOR,
            },
            Self {
                kind: EnemyKind::Boss,
                size: 0.98,
                health: 2_000,
                armor: 15,
                speed: 0.03,
                reward: 150,
                slow_floor: DEFAULT_SLOW_FLOOR,
            },
        ]
    }
}

/// Everything the field needs to know about kinds, stats and pacing.
///
/// Missing TOML keys fall back to [`RuleBook::default`]; lists and tables
/// given in TOML replace the defaults wholesale.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleBook {
    /// Ticks in one in-game second; damage over time fires on each boundary.
    pub ticks_per_second: u64,
    /// Whether destruction sounds are requested at all.
    pub sfx: bool,
    /// Credit available when the field is created.
    pub starting_credit: i64,
    /// Ticks an explosion stays on the field.
    pub explosion_lifetime_ticks: u64,
    /// Per-kind enemy stats.
    pub enemies: Vec<EnemyStats>,
    /// Per-kind tower stats.
    pub towers: Vec<TowerStats>,
    /// Pairs of kinds that may never overlap.
    pub collisions: CollisionTable,
    /// Pairs of kinds where the first detonates on the second.
    pub effects: EffectTable,
    /// Destruction sound cues.
    pub sounds: SoundTable,
}

impl RuleBook {
    /// Parses a rule book from TOML and validates it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let rules: RuleBook = toml::from_str(contents)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reads, parses and validates a rule book file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks that pacing is defined and every kind has sane stats.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTicksPerSecond);
        }

        for kind in EnemyKind::ALL {
            let stats = self.enemy(kind).ok_or(ConfigError::MissingEnemy(kind))?;
            if !(stats.size.is_finite() && stats.size > 0.0) {
                return Err(ConfigError::InvalidEnemy {
                    kind,
                    reason: "size must be positive",
                });
            }
            if !(stats.speed.is_finite() && stats.speed >= 0.0) {
                return Err(ConfigError::InvalidEnemy {
                    kind,
                    reason: "speed must not be negative",
                });
            }
            if !(0.0..=1.0).contains(&stats.slow_floor) {
                return Err(ConfigError::InvalidEnemy {
                    kind,
                    reason: "slow_floor must lie between 0 and 1",
                });
            }
            if stats.health <= 0 {
                return Err(ConfigError::InvalidEnemy {
                    kind,
                    reason: "health must be positive",
                });
            }
        }

        for kind in TowerKind::ALL {
            let stats = self.tower(kind).ok_or(ConfigError::MissingTower(kind))?;
            if !(stats.range.is_finite() && stats.range >= 0.0) {
                return Err(ConfigError::InvalidTower {
                    kind,
                    reason: "range must not be negative",
                });
            }
        }

        Ok(())
    }

    /// Stats configured for an enemy kind.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemyStats> {
        self.enemies.iter().find(|stats| stats.kind == kind)
    }

    /// Stats configured for a tower kind.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> Option<&TowerStats> {
        self.towers.iter().find(|stats| stats.kind == kind)
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            sfx: true,
            starting_credit: 100,
            explosion_lifetime_ticks: 10,
            enemies: EnemyStats::standard(),
            towers: TowerStats::standard(),
            collisions: CollisionTable::standard(),
            effects: EffectTable::standard(),
            sounds: SoundTable::standard(),
        }
    }
}

/// Reasons a rule book could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read rule book {path}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The TOML was malformed or did not match the expected shape.
    #[error("failed to parse rule book")]
    Parse(#[from] toml::de::Error),
    /// A second must last at least one tick.
    #[error("ticks_per_second must be at least 1")]
    ZeroTicksPerSecond,
    /// An enemy kind has no stats.
    #[error("no stats for enemy kind {0:?}")]
    MissingEnemy(EnemyKind),
    /// A tower kind has no stats.
    #[error("no stats for tower kind {0:?}")]
    MissingTower(TowerKind),
    /// An enemy kind has unusable stats.
    #[error("invalid stats for enemy kind {kind:?}: {reason}")]
    InvalidEnemy {
        /// Offending kind.
        kind: EnemyKind,
        /// What is wrong.
        reason: &'static str,
    },
    /// A tower kind has unusable stats.
    #[error("invalid stats for tower kind {kind:?}: {reason}")]
    InvalidTower {
        /// Offending kind.
        kind: TowerKind,
        /// What is wrong.
        reason: &'static str,
    },
}
