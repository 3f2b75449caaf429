#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-enemy pursuit decisions.

use delve_core::{EnemyAction, GridPos};
use delve_world::{Enemy, TileGrid};
use rand::Rng;
use std::cmp::Ordering;

/// Decides one enemy's action for the current turn.
///
/// Rule order:
/// 1. A Chebyshev distance of at most 1 to the player (diagonals and the
///    player's own tile included) yields [`EnemyAction::Attack`], decided
///    before any rng draw so adjacency never perturbs the shared stream.
/// 2. Otherwise the enemy takes a unit step toward the player on each axis
///    (the sign of the coordinate delta). With probability `stumble_chance`
///    exactly one axis is zeroed, chosen by a second uniform draw, so pursuit
///    is imperfect.
/// 3. The destination must be an in-bounds floor tile that `is_occupied`
///    reports free; anything else yields [`EnemyAction::Stay`]. The enemy's
///    own tile counts as occupied, so a fully stumbled step stays put.
///
/// Memoryless: every call recomputes from current positions, and no path
/// state survives between turns.
pub fn decide_move<F>(
    enemy: &Enemy,
    player_pos: GridPos,
    grid: &TileGrid,
    is_occupied: F,
    stumble_chance: f64,
    rng: &mut impl Rng,
) -> EnemyAction
where
    F: Fn(GridPos) -> bool,
{
    if enemy.pos.chebyshev_distance(player_pos) <= 1 {
        return EnemyAction::Attack;
    }

    let mut dx = step_toward(enemy.pos.x(), player_pos.x());
    let mut dy = step_toward(enemy.pos.y(), player_pos.y());

    if rng.gen_bool(stumble_chance) {
        if rng.gen_bool(0.5) {
            dx = 0;
        } else {
            dy = 0;
        }
    }

    let Some(destination) = enemy.pos.offset(dx, dy) else {
        return EnemyAction::Stay;
    };
    if destination == enemy.pos {
        return EnemyAction::Stay;
    }
    if grid.is_floor(destination) && !is_occupied(destination) {
        EnemyAction::MoveTo(destination)
    } else {
        EnemyAction::Stay
    }
}

fn step_toward(from: u32, to: u32) -> i32 {
    match from.cmp(&to) {
        Ordering::Less => 1,
        Ordering::Equal => 0,
        Ordering::Greater => -1,
    }
}
