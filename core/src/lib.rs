#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve engine.
//!
//! This crate defines the message surface that connects the host adapter, the
//! world state, and the pure systems. The host feeds [`Intent`] values into
//! the turn engine once per tick, the engine derives a fresh world state and
//! reports what happened as [`Event`] values, and the host draws from a
//! read-only [`WorldView`] projection. Systems consume borrowing views and
//! snapshots, never owned state.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Delve.";

/// Passability of a single map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Passable ground an entity may occupy.
    Floor,
    /// Impassable rock; never holds an entity.
    Wall,
}

impl Tile {
    /// Reports whether the tile can be walked on.
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPos {
    x: u32,
    y: u32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Applies a signed single-tile offset, returning `None` when the result
    /// would leave the non-negative coordinate space.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<GridPos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(GridPos::new(x, y))
    }

    /// Computes the Chebyshev distance between two positions: the maximum of
    /// the per-axis deltas, so diagonal neighbours are at distance 1.
    #[must_use]
    pub fn chebyshev_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Unique identifier assigned to an enemy within one level.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
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

/// Unique identifier assigned to an item within one level.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
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

/// Hit points carried by the player and enemies.
///
/// Damage saturates at zero, the death floor; persisted state never records a
/// negative value. Healing clamps at a caller-supplied maximum.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit-point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health remaining after taking `amount` damage, clamped at
    /// the zero death floor.
    #[must_use]
    pub const fn damage(self, amount: u32) -> Health {
        Health(self.0.saturating_sub(amount))
    }

    /// Returns the health after restoring `amount` points, clamped at `max`.
    #[must_use]
    pub fn heal(self, amount: u32, max: Health) -> Health {
        Health(self.0.saturating_add(amount).min(max.0))
    }

    /// Reports whether the death floor has been reached.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// One player input consumed by the turn engine per host tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Step or attack in the given direction. The host maps at most one axis
    /// to a nonzero value; a zero move is a no-op.
    Move {
        /// Signed column delta in `{-1, 0, 1}`.
        dx: i32,
        /// Signed row delta in `{-1, 0, 1}`.
        dy: i32,
    },
    /// Dismiss the pending message and resume the interrupted phase.
    Acknowledge,
    /// Begin a fresh run; only honoured on the game-over screen.
    Restart,
    /// No input arrived this tick.
    Idle,
}

/// Sub-state of the turn cycle the world currently rests in or is resolving.
///
/// At rest a world is only ever in [`Phase::PlayerTurn`],
/// [`Phase::AwaitingAck`], or [`Phase::GameOver`]; the remaining phases
/// cascade inside a single engine call without further input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player's move intent.
    PlayerTurn,
    /// Resolving enemy attacks, one enemy per step.
    EnemyAttack {
        /// Index into the world's enemy list of the next attacker.
        index: usize,
    },
    /// Resolving enemy movement, one enemy per step.
    EnemyMove {
        /// Index into the world's enemy list of the next mover.
        index: usize,
    },
    /// Holding a message on screen until the host acknowledges it.
    AwaitingAck {
        /// Phase to resume once the acknowledgment arrives.
        resume: Box<Phase>,
    },
    /// The level was cleared; the next level is generated from here.
    LevelTransition,
    /// The player died; only a restart intent leaves this state.
    GameOver,
}

impl Phase {
    /// Wraps `resume` in an acknowledgment gate.
    #[must_use]
    pub fn awaiting(resume: Phase) -> Phase {
        Phase::AwaitingAck {
            resume: Box::new(resume),
        }
    }

    /// Reports whether the world is holding a message for acknowledgment.
    #[must_use]
    pub const fn is_awaiting_ack(&self) -> bool {
        matches!(self, Phase::AwaitingAck { .. })
    }
}

/// Decision produced by the enemy AI for a single enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    /// The enemy is adjacent to the player and will strike in the attack
    /// phase; it holds position during the move phase.
    Attack,
    /// Step onto the given free floor tile.
    MoveTo(GridPos),
    /// No legal step toward the player exists this turn.
    Stay,
}

/// Result of resolving a single attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Hit points subtracted from the defender.
    pub damage: u32,
    /// Defender health after the blow, clamped at the death floor.
    pub remaining: Health,
    /// Whether the blow reduced the defender to zero health.
    pub slain: bool,
}

/// Facts the turn engine reports while deriving the next world state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The player stepped onto a free floor tile.
    PlayerMoved {
        /// Tile the player previously occupied.
        from: GridPos,
        /// Tile the player occupies now.
        to: GridPos,
    },
    /// The player struck an enemy.
    PlayerStruck {
        /// Identifier of the defender.
        enemy: EnemyId,
        /// Hit points dealt.
        damage: u32,
        /// Whether the enemy died and was removed.
        slain: bool,
    },
    /// The player picked up a potion and was healed.
    PotionConsumed {
        /// Identifier of the consumed item.
        item: ItemId,
        /// Hit points actually restored after clamping.
        healed: u32,
    },
    /// An enemy landed a blow on the player.
    PlayerDamaged {
        /// Identifier of the attacker.
        enemy: EnemyId,
        /// Hit points dealt.
        damage: u32,
    },
    /// An adjacent enemy swung and missed.
    AttackMissed {
        /// Identifier of the attacker.
        enemy: EnemyId,
    },
    /// An enemy stepped toward the player.
    EnemyMoved {
        /// Identifier of the mover.
        enemy: EnemyId,
        /// Tile the enemy previously occupied.
        from: GridPos,
        /// Tile the enemy occupies now.
        to: GridPos,
    },
    /// A freshly generated level was entered.
    LevelEntered {
        /// One-based number of the new level.
        level: u32,
    },
    /// The player's health reached the death floor.
    PlayerDied,
    /// A restart intent replaced the run with a fresh level-1 world.
    RunRestarted,
}

/// Tuning constants the host supplies at engine construction.
///
/// Nothing in the engine or the systems hardcodes these values; tests inject
/// degenerate chances (0.0 / 1.0) to force deterministic branches.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Number of tile columns in a generated level.
    pub grid_columns: u32,
    /// Number of tile rows in a generated level.
    pub grid_rows: u32,
    /// Extra wall tiles punched into the carved room per level.
    pub wall_punches: u32,
    /// Enemies placed on each freshly generated level.
    pub enemy_count: usize,
    /// Healing potions placed on each freshly generated level.
    pub item_count: usize,
    /// Player starting and maximum hit points.
    pub player_hp: u32,
    /// Hit points the player subtracts per blow.
    pub player_attack: u32,
    /// Enemy starting hit points.
    pub enemy_hp: u32,
    /// Hit points an enemy subtracts per landed blow.
    pub enemy_attack: u32,
    /// Hit points restored by one potion, clamped at the player maximum.
    pub heal_amount: u32,
    /// Probability an adjacent enemy lands its blow.
    pub hit_chance: f64,
    /// Probability a pursuing enemy loses one axis of its step.
    pub stumble_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_columns: 20,
            grid_rows: 15,
            wall_punches: 10,
            enemy_count: 3,
            item_count: 2,
            player_hp: 20,
            player_attack: 5,
            enemy_hp: 10,
            enemy_attack: 2,
            heal_amount: 5,
            hit_chance: 0.9,
            stumble_chance: 0.3,
        }
    }
}

/// Errors surfaced while generating a level.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Placement was asked for more free tiles than the map offers. Fatal to
    /// the generation call; indicates a map size misconfigured relative to
    /// the entity count.
    #[error("placement requested {requested} free tiles but only {available} exist")]
    InsufficientSpace {
        /// Number of distinct free tiles the caller asked for.
        requested: usize,
        /// Number of floor tiles actually available.
        available: usize,
    },
}

/// Read-only view over a level's dense tile storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGridView<'a> {
    tiles: &'a [Tile],
    columns: u32,
    rows: u32,
}

impl<'a> TileGridView<'a> {
    /// Captures a new view backed by the provided row-major tile slice.
    #[must_use]
    pub fn new(tiles: &'a [Tile], columns: u32, rows: u32) -> Self {
        Self {
            tiles,
            columns,
            rows,
        }
    }

    /// Returns the tile at the provided position, if it is in bounds.
    #[must_use]
    pub fn tile(&self, pos: GridPos) -> Option<Tile> {
        self.index(pos).and_then(|index| self.tiles.get(index)).copied()
    }

    /// Reports whether the position names an in-bounds floor tile.
    #[must_use]
    pub fn is_floor(&self, pos: GridPos) -> bool {
        self.tile(pos).is_some_and(Tile::is_floor)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Returns an iterator over all tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + 'a {
        self.tiles.iter().copied()
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.x() < self.columns && pos.y() < self.rows {
            let row = usize::try_from(pos.y()).ok()?;
            let column = usize::try_from(pos.x()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Immutable representation of the player used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Tile the player occupies.
    pub pos: GridPos,
    /// Current hit points.
    pub hp: Health,
    /// Hit-point ceiling healing clamps at.
    pub max_hp: Health,
    /// Hit points dealt per blow.
    pub attack: u32,
    /// Experience accumulated from slain enemies.
    pub exp: u32,
}

/// Immutable representation of a single enemy used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Identifier assigned at level generation.
    pub id: EnemyId,
    /// Tile the enemy occupies.
    pub pos: GridPos,
    /// Current hit points.
    pub hp: Health,
    /// Hit points dealt per landed blow.
    pub attack: u32,
}

/// Immutable representation of a single item used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Identifier assigned at level generation.
    pub id: ItemId,
    /// Tile the item rests on.
    pub pos: GridPos,
}

/// Read-only snapshot describing all enemies on the current level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all items on the current level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemView {
    snapshots: Vec<ItemSnapshot>,
}

impl ItemView {
    /// Creates a new item view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ItemSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured item snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ItemSnapshot> {
        self.snapshots
    }
}

/// Complete read-only projection handed to the host's drawing layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldView<'a> {
    /// One-based number of the current level.
    pub level: u32,
    /// Borrowing view over the level's tiles.
    pub tiles: TileGridView<'a>,
    /// Snapshot of the player.
    pub player: PlayerSnapshot,
    /// Snapshots of all live enemies in resolution order by identifier.
    pub enemies: EnemyView,
    /// Snapshots of all remaining items.
    pub items: ItemView,
    /// Pending message text; empty when nothing is on screen.
    pub message: &'a str,
    /// Whether the engine is holding the message for acknowledgment.
    pub awaiting_ack: bool,
    /// Whether the run has ended and only a restart intent is honoured.
    pub game_over: bool,
}
