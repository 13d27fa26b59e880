#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that turns an ASCII map into spawn commands.
//!
//! Glyphs:
//!
//! | glyph        | meaning                              |
//! |--------------|--------------------------------------|
//! | `#`          | mountain                             |
//! | `.`          | road                                 |
//! | `T`          | target standing on a road tile       |
//! | `S`          | enemy spawner standing on a road tile|
//! | `n` `s` `m` `t` | normal, sniper, machine gun, timer tower |
//! | `_` or space | empty ground                         |
//!
//! Road distances are the number of 4-connected road steps to the target.

use std::collections::VecDeque;

use thiserror::Error;
use tile_defence_core::{Command, EnemyKind, Event, SpawnPlan, SpawnRequest, TowerKind, TILE_SIZE};
use tile_defence_world::{apply, Field};
use tracing::{debug, info};

/// Map used when no layout file is supplied.
pub const DEFAULT_LAYOUT: &str = "\
#############
S..........##
####n#####.t#
##.........##
##.#####m####
##.........T#
######s######
";

/// Health of the target unless configured otherwise.
pub const DEFAULT_TARGET_HEALTH: i64 = 1_000;

/// Contents of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// Nothing is placed.
    Ground,
    /// Walkable road.
    Road,
    /// Impassable mountain.
    Mountain,
    /// The player's base.
    Target,
    /// Enemy spawner.
    Spawner,
    /// Tower of the provided kind.
    Tower(TowerKind),
}

impl Glyph {
    fn parse(glyph: char) -> Option<Self> {
        let parsed = match glyph {
            '#' => Self::Mountain,
            '.' => Self::Road,
            'T' => Self::Target,
            'S' => Self::Spawner,
            'n' => Self::Tower(TowerKind::Normal),
            's' => Self::Tower(TowerKind::Sniper),
            'm' => Self::Tower(TowerKind::MachineGun),
            't' => Self::Tower(TowerKind::Timer),
            '_' | ' ' => Self::Ground,
            _ => return None,
        };
        Some(parsed)
    }

    const fn is_walkable(self) -> bool {
        matches!(self, Self::Road | Self::Target | Self::Spawner)
    }
}

/// Reasons a layout could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout has no cells.
    #[error("layout is empty")]
    Empty,
    /// A character has no meaning.
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
        /// Offending character.
        glyph: char,
    },
    /// No `T` was found.
    #[error("layout has no target")]
    MissingTarget,
    /// More than one `T` was found.
    #[error("layout has more than one target")]
    MultipleTargets,
}

/// Parsed rectangular map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
    target: (usize, usize),
}

impl Layout {
    /// Parses an ASCII map. Short rows are padded with ground.
    pub fn parse(source: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = source
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let rows = match rows.iter().rposition(|row| !row.trim().is_empty()) {
            Some(last) => &rows[..=last],
            None => return Err(LayoutError::Empty),
        };

        let width = rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0);
        let height = rows.len();
        let mut cells = vec![Glyph::Ground; width * height];
        let mut target = None;

        for (row, line) in rows.iter().enumerate() {
            for (column, glyph) in line.chars().enumerate() {
                let parsed = Glyph::parse(glyph).ok_or(LayoutError::UnknownGlyph {
                    row,
                    column,
                    glyph,
                })?;
                if parsed == Glyph::Target && target.replace((column, row)).is_some() {
                    return Err(LayoutError::MultipleTargets);
                }
                cells[row * width + column] = parsed;
            }
        }

        let target = target.ok_or(LayoutError::MissingTarget)?;
        Ok(Self {
            width,
            height,
            cells,
            target,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Glyph at the provided cell, if it lies inside the map.
    #[must_use]
    pub fn glyph(&self, column: usize, row: usize) -> Option<Glyph> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + column).copied()
    }

    /// Road steps from every walkable cell to the target, in row-major order.
    /// Cells that are not walkable or cannot reach the target hold `None`.
    #[must_use]
    pub fn road_distances(&self) -> Vec<Option<u32>> {
        let mut distances = vec![None; self.cells.len()];
        let mut queue = VecDeque::new();
        let (column, row) = self.target;
        distances[row * self.width + column] = Some(0);
        queue.push_back(self.target);

        while let Some((column, row)) = queue.pop_front() {
            let Some(current) = distances[row * self.width + column] else {
                continue;
            };
            for (next_column, next_row) in self.neighbors(column, row) {
                let index = next_row * self.width + next_column;
                if distances[index].is_some() || !self.cells[index].is_walkable() {
                    continue;
                }
                distances[index] = Some(current + 1);
                queue.push_back((next_column, next_row));
            }
        }

        distances
    }

    fn neighbors(&self, column: usize, row: usize) -> impl Iterator<Item = (usize, usize)> {
        let (width, height) = (self.width, self.height);
        [
            column.checked_sub(1).map(|left| (left, row)),
            (column + 1 < width).then_some((column + 1, row)),
            row.checked_sub(1).map(|up| (column, up)),
            (row + 1 < height).then_some((column, row + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Pure system producing the spawn commands that populate a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bootstrap {
    plan: SpawnPlan,
    target_health: i64,
}

impl Bootstrap {
    /// Creates a bootstrap releasing enemies per `plan` toward a target with
    /// `target_health`.
    #[must_use]
    pub const fn new(plan: SpawnPlan, target_health: i64) -> Self {
        Self {
            plan,
            target_health,
        }
    }

    /// Spawn schedule attached to every spawner.
    #[must_use]
    pub const fn plan(&self) -> SpawnPlan {
        self.plan
    }

    /// Emits one spawn command per placed entity. Roads come first so that
    /// every other tile is placed on top of an existing distance field.
    #[must_use]
    pub fn commands(&self, layout: &Layout) -> Vec<Command> {
        let distances = layout.road_distances();
        let unreachable = (layout.width * layout.height) as f64;
        let mut roads = Vec::new();
        let mut others = Vec::new();

        for (index, glyph) in layout.cells.iter().enumerate() {
            let x = (index % layout.width) as f64 * TILE_SIZE;
            let y = (index / layout.width) as f64 * TILE_SIZE;

            if glyph.is_walkable() {
                let distance = distances[index].map_or(unreachable, f64::from);
                if distances[index].is_none() {
                    debug!(x, y, "road cell cannot reach the target");
                }
                roads.push(SpawnRequest::Road { x, y, distance });
            }

            let request = match *glyph {
                Glyph::Ground | Glyph::Road => continue,
                Glyph::Mountain => SpawnRequest::Mountain { x, y },
                Glyph::Target => SpawnRequest::Target {
                    x,
                    y,
                    health: self.target_health,
                },
                Glyph::Spawner => SpawnRequest::Spawner {
                    x,
                    y,
                    plan: self.plan,
                },
                Glyph::Tower(kind) => SpawnRequest::Tower { kind, x, y },
            };
            others.push(request);
        }

        roads
            .into_iter()
            .chain(others)
            .map(|request| Command::Spawn { request })
            .collect()
    }

    /// Applies every spawn command for `layout` to the field.
    pub fn populate(&self, field: &mut Field, layout: &Layout, out_events: &mut Vec<Event>) {
        let commands = self.commands(layout);
        let placed = commands.len();
        for command in commands {
            apply(field, command, out_events);
        }
        info!(
            placed,
            width = layout.width,
            height = layout.height,
            "field populated"
        );
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new(
            SpawnPlan {
                enemy: EnemyKind::Normal,
                initial_delay: 30,
                interval: 90,
                count: 10,
            },
            DEFAULT_TARGET_HEALTH,
        )
    }
}
