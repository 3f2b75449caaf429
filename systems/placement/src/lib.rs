#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn-tile selection for freshly generated levels.

use delve_core::{GenerationError, GridPos};
use delve_world::TileGrid;
use rand::seq::SliceRandom;
use rand::Rng;

/// Selects `count` distinct free floor tiles from the grid.
///
/// Every floor coordinate is collected in row-major order, shuffled once with
/// the shared rng stream, and the first `count` entries are taken, so the
/// result is pairwise distinct and the amount of work is bounded by the grid
/// size rather than by a retry loop. Entities placed from a single call can
/// therefore never collide.
///
/// Errors with [`GenerationError::InsufficientSpace`] when `count` exceeds
/// the number of floor tiles; callers size their requests against the floor
/// budget, and the error is fatal to the generation call rather than retried.
pub fn select_spawn_tiles(
    grid: &TileGrid,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<GridPos>, GenerationError> {
    let mut floors = floor_tiles(grid);
    if count > floors.len() {
        return Err(GenerationError::InsufficientSpace {
            requested: count,
            available: floors.len(),
        });
    }

    floors.shuffle(rng);
    floors.truncate(count);
    Ok(floors)
}

fn floor_tiles(grid: &TileGrid) -> Vec<GridPos> {
    let mut floors = Vec::new();
    for y in 0..grid.rows() {
        for x in 0..grid.columns() {
            let pos = GridPos::new(x, y);
            if grid.is_floor(pos) {
                floors.push(pos);
            }
        }
    }
    floors
}
