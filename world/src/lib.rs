#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! World state for Delve.
//!
//! A [`WorldState`] is one complete, self-contained snapshot of a run: the
//! level's tile grid, the entities inhabiting it, the current turn phase, and
//! the pending message. The turn engine never mutates a snapshot it was
//! given; it derives a fresh copy with its deltas applied and the host
//! replaces its single live binding between frames. Because waiting is
//! encoded in the phase rather than in control flow, any resting snapshot is
//! serializable and a run can resume from it.

use delve_core::{EnemyId, GridPos, Health, ItemId, Phase, Tile, TileGridView};
use serde::{Deserialize, Serialize};

/// Dense, row-major tile storage for one level.
///
/// Immutable once generated; a level change replaces the whole grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid from row-major tile storage.
    ///
    /// `tiles` must hold exactly `columns * rows` entries.
    #[must_use]
    pub fn from_tiles(columns: u32, rows: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len() as u64, u64::from(columns) * u64::from(rows));
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of tile columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Captures a borrowing view suitable for systems and rendering.
    #[must_use]
    pub fn view(&self) -> TileGridView<'_> {
        TileGridView::new(&self.tiles, self.columns, self.rows)
    }

    /// Reports whether the position names an in-bounds floor tile.
    #[must_use]
    pub fn is_floor(&self, pos: GridPos) -> bool {
        self.view().is_floor(pos)
    }
}

/// The player-controlled adventurer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Tile the player occupies; always a floor tile.
    pub pos: GridPos,
    /// Current hit points.
    pub hp: Health,
    /// Ceiling that potion healing clamps at.
    pub max_hp: Health,
    /// Hit points subtracted from an enemy per blow.
    pub attack: u32,
    /// Experience accumulated from slain enemies.
    pub exp: u32,
}

/// One wandering enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Identifier assigned at level generation; unique within the level.
    pub id: EnemyId,
    /// Tile the enemy occupies; always a floor tile.
    pub pos: GridPos,
    /// Current hit points.
    pub hp: Health,
    /// Hit points subtracted from the player per landed blow.
    pub attack: u32,
}

/// One healing potion resting on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier assigned at level generation; unique within the level.
    pub id: ItemId,
    /// Tile the item rests on; always a floor tile.
    pub pos: GridPos,
}

/// One complete snapshot of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    /// One-based level number.
    pub level: u32,
    /// The level's immutable tile grid.
    pub grid: TileGrid,
    /// The player.
    pub player: Player,
    /// Live enemies; list order is the attack/move resolution order.
    pub enemies: Vec<Enemy>,
    /// Remaining items.
    pub items: Vec<Item>,
    /// Turn phase the snapshot rests in or resumes from.
    pub phase: Phase,
    /// Pending message text; empty when nothing is on screen.
    pub message: String,
}

impl WorldState {
    /// Returns the index of the live enemy occupying `pos`, if any.
    #[must_use]
    pub fn enemy_index_at(&self, pos: GridPos) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.pos == pos)
    }

    /// Returns the index of the item resting on `pos`, if any.
    #[must_use]
    pub fn item_index_at(&self, pos: GridPos) -> Option<usize> {
        self.items.iter().position(|item| item.pos == pos)
    }

    /// Reports whether any entity occupies `pos`.
    ///
    /// The player, every enemy, and every item all count as occupants; enemy
    /// movement treats item tiles as blocked.
    #[must_use]
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        self.player.pos == pos
            || self.enemies.iter().any(|enemy| enemy.pos == pos)
            || self.items.iter().any(|item| item.pos == pos)
    }

    /// Reports whether the snapshot is holding a message for acknowledgment.
    #[must_use]
    pub fn awaiting_ack(&self) -> bool {
        self.phase.is_awaiting_ack()
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::WorldState;
    use delve_core::{
        EnemySnapshot, EnemyView, ItemSnapshot, ItemView, PlayerSnapshot, WorldView,
    };

    /// Captures a snapshot of the player.
    #[must_use]
    pub fn player_snapshot(world: &WorldState) -> PlayerSnapshot {
        PlayerSnapshot {
            pos: world.player.pos,
            hp: world.player.hp,
            max_hp: world.player.max_hp,
            attack: world.player.attack,
            exp: world.player.exp,
        }
    }

    /// Captures a read-only view of the enemies on the current level.
    #[must_use]
    pub fn enemy_view(world: &WorldState) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    pos: enemy.pos,
                    hp: enemy.hp,
                    attack: enemy.attack,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the items on the current level.
    #[must_use]
    pub fn item_view(world: &WorldState) -> ItemView {
        ItemView::from_snapshots(
            world
                .items
                .iter()
                .map(|item| ItemSnapshot {
                    id: item.id,
                    pos: item.pos,
                })
                .collect(),
        )
    }

    /// Builds the complete read-only projection the host renders from.
    ///
    /// Querying performs no hidden mutation: two calls on the same snapshot
    /// yield equal views.
    #[must_use]
    pub fn world_view(world: &WorldState) -> WorldView<'_> {
        WorldView {
            level: world.level,
            tiles: world.grid.view(),
            player: player_snapshot(world),
            enemies: enemy_view(world),
            items: item_view(world),
            message: &world.message,
            awaiting_ack: world.awaiting_ack(),
            game_over: world.phase == delve_core::Phase::GameOver,
        }
    }
}
