#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The turn-resolution state machine.
//!
//! [`TurnEngine::advance`] consumes exactly one host intent against an
//! immutable world snapshot and returns a freshly derived snapshot: the
//! player's action resolves first, then zero or more enemy phases cascade
//! without further input until the world rests in a phase that needs one —
//! the player's next turn, a message awaiting acknowledgment, or the
//! game-over screen. Waiting lives in the phase data rather than in control
//! flow, so any resting snapshot can be serialized and resumed.
//!
//! Level generation runs only on level change: the map generator carves the
//! room, placement shuffles out distinct spawn tiles, and the previous
//! snapshot is superseded wholesale.

use delve_core::{
    EnemyAction, EnemyId, EngineConfig, Event, GenerationError, GridPos, Health, Intent, ItemId,
    Phase,
};
use delve_system_combat as combat;
use delve_system_enemy_ai as enemy_ai;
use delve_system_mapgen as mapgen;
use delve_system_placement as placement;
use delve_world::{Enemy, Item, Player, WorldState};
use rand::Rng;

/// The deterministic phase state machine driving one full turn cycle.
///
/// The engine owns nothing but its configuration; the host owns the single
/// live [`WorldState`] and the seeded rng stream, and replaces its state
/// binding with each returned snapshot.
#[derive(Clone, Copy, Debug)]
pub struct TurnEngine {
    config: EngineConfig,
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TurnEngine {
    /// Creates an engine with the provided tuning constants.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Provides read access to the tuning constants.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generates the level-1 world a fresh run starts from.
    pub fn new_run(&self, rng: &mut impl Rng) -> Result<WorldState, GenerationError> {
        self.generate_level(1, None, rng)
    }

    /// Advances the world by one host intent.
    ///
    /// Derives a full copy of `world`, applies the intent, cascades through
    /// any no-input phases, and returns the copy resting in `PlayerTurn`,
    /// `AwaitingAck`, or `GameOver`. Unrecognized intents are no-ops, so the
    /// returned snapshot equals the input. Facts about what resolved are
    /// appended to `out_events`.
    ///
    /// The only error is [`GenerationError::InsufficientSpace`] from level
    /// generation, propagated rather than retried.
    pub fn advance(
        &self,
        world: &WorldState,
        intent: Intent,
        rng: &mut impl Rng,
        out_events: &mut Vec<Event>,
    ) -> Result<WorldState, GenerationError> {
        let mut next = world.clone();
        match next.phase.clone() {
            Phase::GameOver => {
                if intent == Intent::Restart {
                    next = self.generate_level(1, None, rng)?;
                    out_events.push(Event::RunRestarted);
                }
            }
            Phase::AwaitingAck { resume } => {
                if intent == Intent::Acknowledge {
                    next.message.clear();
                    next.phase = *resume;
                    self.cascade(&mut next, rng, out_events)?;
                }
            }
            Phase::PlayerTurn => {
                if let Intent::Move { dx, dy } = intent {
                    self.resolve_player_move(&mut next, dx, dy, out_events);
                    self.cascade(&mut next, rng, out_events)?;
                }
            }
            // A snapshot resting mid-cascade (possible when resumed from
            // serialized form) finishes the cascade whatever the intent.
            Phase::EnemyAttack { .. } | Phase::EnemyMove { .. } | Phase::LevelTransition => {
                self.cascade(&mut next, rng, out_events)?;
            }
        }
        Ok(next)
    }

    /// Resolves a `Move` intent while the world rests in `PlayerTurn`.
    ///
    /// A zero delta, an out-of-bounds target, or a wall leaves the world
    /// untouched in `PlayerTurn`. Striking an enemy or picking up a potion
    /// gates the follow-up enemy phases behind an acknowledgment; a plain
    /// step enters them directly.
    fn resolve_player_move(
        &self,
        world: &mut WorldState,
        dx: i32,
        dy: i32,
        out_events: &mut Vec<Event>,
    ) {
        if dx == 0 && dy == 0 {
            return;
        }
        let Some(target) = world.player.pos.offset(dx, dy) else {
            return;
        };
        if !world.grid.is_floor(target) {
            return;
        }

        if let Some(index) = world.enemy_index_at(target) {
            let defender = world.enemies[index];
            let outcome = combat::resolve_attack(world.player.attack, defender.hp);
            let mut message = format!("YOU DEAL {}pt DAMAGE", outcome.damage);
            if outcome.slain {
                let _ = world.enemies.remove(index);
                world.player.exp += 1;
                message.push_str(" and SLAIN");
            } else {
                world.enemies[index].hp = outcome.remaining;
            }
            message.push('!');
            world.message = message;
            world.phase = Phase::awaiting(Phase::EnemyAttack { index: 0 });
            out_events.push(Event::PlayerStruck {
                enemy: defender.id,
                damage: outcome.damage,
                slain: outcome.slain,
            });
            return;
        }

        let from = world.player.pos;
        world.player.pos = target;
        out_events.push(Event::PlayerMoved { from, to: target });

        if let Some(item) = combat::resolve_pickup(target, &world.items) {
            if let Some(index) = world.item_index_at(target) {
                let _ = world.items.remove(index);
            }
            let before = world.player.hp;
            world.player.hp = before.heal(self.config.heal_amount, world.player.max_hp);
            world.message = format!("YOU GET a POTION and HEAL {}pt.", self.config.heal_amount);
            world.phase = Phase::awaiting(Phase::EnemyAttack { index: 0 });
            out_events.push(Event::PotionConsumed {
                item,
                healed: world.player.hp.get() - before.get(),
            });
        } else {
            world.phase = Phase::EnemyAttack { index: 0 };
        }
    }

    /// Resolves no-input phases until the world rests in one that needs
    /// input again.
    ///
    /// Enemy attacks stop the cascade behind an acknowledgment when a blow
    /// lands, and halt the phase outright the moment the player dies; enemy
    /// movement and missed or out-of-range attacks resolve silently. An
    /// emptied enemy list routes the move phase into level transition.
    fn cascade(
        &self,
        world: &mut WorldState,
        rng: &mut impl Rng,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GenerationError> {
        loop {
            match world.phase.clone() {
                Phase::EnemyAttack { index } => {
                    if index >= world.enemies.len() {
                        world.phase = Phase::EnemyMove { index: 0 };
                        continue;
                    }
                    let enemy = world.enemies[index];
                    if enemy.pos.chebyshev_distance(world.player.pos) > 1 {
                        world.phase = Phase::EnemyAttack { index: index + 1 };
                        continue;
                    }
                    if !combat::resolve_hit_chance(self.config.hit_chance, rng) {
                        out_events.push(Event::AttackMissed { enemy: enemy.id });
                        world.phase = Phase::EnemyAttack { index: index + 1 };
                        continue;
                    }
                    let outcome = combat::resolve_attack(enemy.attack, world.player.hp);
                    world.player.hp = outcome.remaining;
                    out_events.push(Event::PlayerDamaged {
                        enemy: enemy.id,
                        damage: outcome.damage,
                    });
                    if outcome.slain {
                        world.message = "YOU DIED...".to_owned();
                        world.phase = Phase::GameOver;
                        out_events.push(Event::PlayerDied);
                        return Ok(());
                    }
                    world.message = format!("YOU ARE DAMAGED by {}pt.", outcome.damage);
                    world.phase = Phase::awaiting(Phase::EnemyAttack { index: index + 1 });
                    return Ok(());
                }
                Phase::EnemyMove { index } => {
                    if index >= world.enemies.len() {
                        world.phase = if world.enemies.is_empty() {
                            Phase::LevelTransition
                        } else {
                            Phase::PlayerTurn
                        };
                        continue;
                    }
                    let action = {
                        let enemy = &world.enemies[index];
                        let occupied = |pos: GridPos| world.is_occupied(pos);
                        enemy_ai::decide_move(
                            enemy,
                            world.player.pos,
                            &world.grid,
                            occupied,
                            self.config.stumble_chance,
                            rng,
                        )
                    };
                    if let EnemyAction::MoveTo(destination) = action {
                        let from = world.enemies[index].pos;
                        world.enemies[index].pos = destination;
                        out_events.push(Event::EnemyMoved {
                            enemy: world.enemies[index].id,
                            from,
                            to: destination,
                        });
                    }
                    world.phase = Phase::EnemyMove { index: index + 1 };
                }
                Phase::LevelTransition => {
                    let level = world.level + 1;
                    let carried = world.player;
                    *world = self.generate_level(level, Some(carried), rng)?;
                    world.message = format!("YOU ENTER LEVEL {level}!");
                    world.phase = Phase::awaiting(Phase::PlayerTurn);
                    out_events.push(Event::LevelEntered { level });
                    return Ok(());
                }
                Phase::PlayerTurn | Phase::AwaitingAck { .. } | Phase::GameOver => return Ok(()),
            }
        }
    }

    /// Generates a complete level: carved grid, then player, enemies, and
    /// items on distinct shuffled floor tiles.
    ///
    /// `carried` repositions an existing player while keeping their hit
    /// points, attack, and experience; `None` rolls the fresh stats a new run
    /// starts with.
    fn generate_level(
        &self,
        level: u32,
        carried: Option<Player>,
        rng: &mut impl Rng,
    ) -> Result<WorldState, GenerationError> {
        let config = self.config;
        let grid = mapgen::generate(
            config.grid_columns,
            config.grid_rows,
            config.wall_punches,
            rng,
        );

        let total = 1 + config.enemy_count + config.item_count;
        let tiles = placement::select_spawn_tiles(&grid, total, rng)?;

        let player = match carried {
            Some(mut player) => {
                player.pos = tiles[0];
                player
            }
            None => Player {
                pos: tiles[0],
                hp: Health::new(config.player_hp),
                max_hp: Health::new(config.player_hp),
                attack: config.player_attack,
                exp: 0,
            },
        };
        let enemies = tiles[1..1 + config.enemy_count]
            .iter()
            .enumerate()
            .map(|(index, &pos)| Enemy {
                id: EnemyId::new(index as u32),
                pos,
                hp: Health::new(config.enemy_hp),
                attack: config.enemy_attack,
            })
            .collect();
        let items = tiles[1 + config.enemy_count..]
            .iter()
            .enumerate()
            .map(|(index, &pos)| Item {
                id: ItemId::new(index as u32),
                pos,
            })
            .collect();

        Ok(WorldState {
            level,
            grid,
            player,
            enemies,
            items,
            phase: Phase::PlayerTurn,
            message: String::new(),
        })
    }
}
