#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic map generation that carves the room for one level.

use delve_core::Tile;
use delve_world::TileGrid;
use rand::Rng;

/// Thickness of the solid wall border surrounding the carved room.
const ROOM_INSET: u32 = 3;

/// Margin that keeps wall punches strictly inside the carved room.
const PUNCH_INSET: u32 = ROOM_INSET + 1;

/// Generates the tile grid for one level.
///
/// The rectangular interior inset by [`ROOM_INSET`] tiles per side becomes
/// floor; everything outside it stays wall. Afterwards `wall_punches` wall
/// tiles are punched at coordinates drawn uniformly from the region inset by
/// [`PUNCH_INSET`] per side, so punches never touch the room edge. Duplicate
/// draws re-punch the same tile, which is a no-op.
///
/// Deterministic given the rng stream. Callers must keep `columns` and
/// `rows` at 8 or above so the inset leaves a floor region; the engine
/// configuration constants satisfy this.
#[must_use]
pub fn generate(columns: u32, rows: u32, wall_punches: u32, rng: &mut impl Rng) -> TileGrid {
    debug_assert!(
        columns >= 2 * ROOM_INSET + 2 && rows >= 2 * ROOM_INSET + 2,
        "grid dimensions leave no floor region"
    );

    let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
    let mut tiles = vec![Tile::Wall; cell_count];

    for y in ROOM_INSET..rows.saturating_sub(ROOM_INSET) {
        for x in ROOM_INSET..columns.saturating_sub(ROOM_INSET) {
            tiles[tile_index(columns, x, y)] = Tile::Floor;
        }
    }

    if columns > 2 * PUNCH_INSET && rows > 2 * PUNCH_INSET {
        for _ in 0..wall_punches {
            let x = rng.gen_range(PUNCH_INSET..=columns - PUNCH_INSET - 1);
            let y = rng.gen_range(PUNCH_INSET..=rows - PUNCH_INSET - 1);
            tiles[tile_index(columns, x, y)] = Tile::Wall;
        }
    }

    TileGrid::from_tiles(columns, rows, tiles)
}

fn tile_index(columns: u32, x: u32, y: u32) -> usize {
    (y as usize) * (columns as usize) + x as usize
}
