//! Kind-keyed rule tables: collision, effect and sound lookups.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::EntityKind;

/// Single row of a [`CollisionTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionRule {
    /// First kind of the pair.
    pub a: EntityKind,
    /// Second kind of the pair.
    pub b: EntityKind,
    /// Whether the two kinds may never overlap.
    pub collidable: bool,
}

/// Symmetric table describing which kinds may never share space.
///
/// Pairs that were never registered answer `false`; such lookups are reported
/// through `tracing` so that new kinds missing their rows are visible without
/// breaking the tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<CollisionRule>")]
pub struct CollisionTable {
    pairs: BTreeMap<(EntityKind, EntityKind), bool>,
}

impl CollisionTable {
    /// Creates an empty table where every lookup is unregistered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table registering every pair of known kinds, with enemies blocked by
    /// mountains and towers.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::new();
        for (index, a) in EntityKind::ALL.iter().enumerate() {
            for b in &EntityKind::ALL[index..] {
                table.set(*a, *b, false);
            }
        }
        for enemy in EntityKind::ALL.iter().filter(|kind| kind.is_enemy()) {
            for blocker in EntityKind::ALL
                .iter()
                .filter(|kind| kind.is_tower() || **kind == EntityKind::Mountain)
            {
                table.set(*enemy, *blocker, true);
            }
        }
        table
    }

    /// Registers or overrides the rule for a pair of kinds.
    pub fn set(&mut self, a: EntityKind, b: EntityKind, collidable: bool) {
        let _ = self.pairs.insert(key(a, b), collidable);
    }

    /// Reports whether entities of kinds `a` and `b` may never overlap.
    #[must_use]
    pub fn collidable(&self, a: EntityKind, b: EntityKind) -> bool {
        match self.pairs.get(&key(a, b)) {
            Some(collidable) => *collidable,
            None => {
                debug!(?a, ?b, "collision pair not registered; treating as passable");
                false
            }
        }
    }

    /// Reports whether at least one rule mentions `kind`.
    #[must_use]
    pub fn knows(&self, kind: EntityKind) -> bool {
        self.pairs.keys().any(|(a, b)| *a == kind || *b == kind)
    }
}

impl From<Vec<CollisionRule>> for CollisionTable {
    fn from(rules: Vec<CollisionRule>) -> Self {
        let mut table = Self::new();
        for rule in rules {
            table.set(rule.a, rule.b, rule.collidable);
        }
        table
    }
}

fn key(a: EntityKind, b: EntityKind) -> (EntityKind, EntityKind) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Single row of an [`EffectTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRule {
    /// Kind carrying the effect.
    pub source: EntityKind,
    /// Living kind the effect applies to.
    pub target: EntityKind,
}

/// Directed table describing which effect sources act on which living kinds
/// when their footprints overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<EffectRule>")]
pub struct EffectTable {
    pairs: BTreeSet<(EntityKind, EntityKind)>,
}

impl EffectTable {
    /// Table where every enemy detonates on the target.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::default();
        for enemy in EntityKind::ALL.iter().filter(|kind| kind.is_enemy()) {
            table.allow(*enemy, EntityKind::Target);
        }
        table
    }

    /// Lets `source` entities act on `target` entities.
    pub fn allow(&mut self, source: EntityKind, target: EntityKind) {
        let _ = self.pairs.insert((source, target));
    }

    /// Reports whether `source` entities act on `target` entities.
    #[must_use]
    pub fn affects(&self, source: EntityKind, target: EntityKind) -> bool {
        self.pairs.contains(&(source, target))
    }
}

impl From<Vec<EffectRule>> for EffectTable {
    fn from(rules: Vec<EffectRule>) -> Self {
        let mut table = Self::default();
        for rule in rules {
            table.allow(rule.source, rule.target);
        }
        table
    }
}

/// Name of an audio clip understood by the audio collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundCue(String);

impl SoundCue {
    /// Wraps a clip name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Clip name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Single row of a [`SoundTable`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundRule {
    /// Kind the cue belongs to.
    pub kind: EntityKind,
    /// Cue played when an entity of that kind is destroyed.
    pub cue: SoundCue,
}

/// Destruction sounds keyed by entity kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<SoundRule>")]
pub struct SoundTable {
    cues: BTreeMap<EntityKind, SoundCue>,
}

impl SoundTable {
    /// Table with one destruction cue per enemy kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut table = Self::default();
        table.set(EntityKind::NormalEnemy, SoundCue::new("normal_enemy_destroy"));
        table.set(EntityKind::SmallerEnemy, SoundCue::new("smaller_enemy_destroy"));
        table.set(EntityKind::TankerEnemy, SoundCue::new("tanker_enemy_destroy"));
        table.set(EntityKind::BossEnemy, SoundCue::new("boss_enemy_destroy"));
        table
    }

    /// Registers or overrides the cue for a kind.
    pub fn set(&mut self, kind: EntityKind, cue: SoundCue) {
        let _ = self.cues.insert(kind, cue);
    }

    /// Cue registered for `kind`, if any.
    #[must_use]
    pub fn cue(&self, kind: EntityKind) -> Option<&SoundCue> {
        self.cues.get(&kind)
    }
}

impl From<Vec<SoundRule>> for SoundTable {
    fn from(rules: Vec<SoundRule>) -> Self {
        let mut table = Self::default();
        for rule in rules {
            table.set(rule.kind, rule.cue);
        }
        table
    }
}
