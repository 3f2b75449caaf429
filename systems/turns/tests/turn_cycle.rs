use delve_core::{EnemyId, EngineConfig, Event, GridPos, Health, Intent, ItemId, Phase, Tile};
use delve_system_turns::TurnEngine;
use delve_world::{Enemy, Item, Player, TileGrid, WorldState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn striking_an_enemy_gates_the_enemy_phases_behind_an_ack() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(6, 5), 10)],
        Vec::new(),
    );

    let mut events = Vec::new();
    let struck = engine
        .advance(&world, Intent::Move { dx: 1, dy: 0 }, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(
        struck.phase,
        Phase::awaiting(Phase::EnemyAttack { index: 0 })
    );
    assert!(struck.message.contains('5'), "message: {}", struck.message);
    assert_eq!(struck.player.pos, GridPos::new(5, 5), "attacking is not moving");
    assert_eq!(struck.enemies[0].hp, Health::new(5));
    assert!(events.contains(&Event::PlayerStruck {
        enemy: EnemyId::new(0),
        damage: 5,
        slain: false,
    }));

    // Acknowledging resumes at the enemy attack phase; the adjacent enemy
    // lands its blow (hit chance forced to 1.0) and gates behind a new ack.
    let mut events = Vec::new();
    let countered = engine
        .advance(&struck, Intent::Acknowledge, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(
        countered.phase,
        Phase::awaiting(Phase::EnemyAttack { index: 1 })
    );
    assert_eq!(countered.player.hp, Health::new(18));
    assert_eq!(countered.message, "YOU ARE DAMAGED by 2pt.");

    // The final ack runs the remaining silent phases back to the player.
    let resting = engine
        .advance(&countered, Intent::Acknowledge, &mut rng, &mut Vec::new())
        .expect("advance");
    assert_eq!(resting.phase, Phase::PlayerTurn);
    assert!(resting.message.is_empty());
}

#[test]
fn awaiting_ack_ignores_every_other_intent() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(8, 8), 10)],
        Vec::new(),
    );
    world.phase = Phase::awaiting(Phase::EnemyAttack { index: 0 });
    world.message = "YOU DEAL 5pt DAMAGE!".to_owned();

    for intent in [
        Intent::Move { dx: 1, dy: 0 },
        Intent::Restart,
        Intent::Idle,
    ] {
        let unchanged = engine
            .advance(&world, intent, &mut rng, &mut Vec::new())
            .expect("advance");
        assert_eq!(unchanged, world);
    }
}

#[test]
fn walls_bounds_and_zero_moves_are_no_ops() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let world = sample_world(
        player_at(GridPos::new(1, 1), 20),
        vec![enemy_at(0, GridPos::new(8, 8), 10)],
        Vec::new(),
    );

    for intent in [
        Intent::Move { dx: -1, dy: 0 },
        Intent::Move { dx: 0, dy: -1 },
        Intent::Move { dx: 0, dy: 0 },
    ] {
        let unchanged = engine
            .advance(&world, intent, &mut rng, &mut Vec::new())
            .expect("advance");
        assert_eq!(unchanged, world);
    }
}

#[test]
fn a_lethal_blow_halts_the_attack_phase_immediately() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 2),
        vec![
            enemy_with_attack(0, GridPos::new(6, 5), 5),
            enemy_with_attack(1, GridPos::new(4, 5), 2),
        ],
        Vec::new(),
    );
    world.phase = Phase::EnemyAttack { index: 0 };

    let mut events = Vec::new();
    let fallen = engine
        .advance(&world, Intent::Idle, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(fallen.phase, Phase::GameOver);
    assert_eq!(fallen.message, "YOU DIED...");
    assert_eq!(fallen.player.hp, Health::new(0));
    assert!(events.contains(&Event::PlayerDied));
    let blows = events
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .count();
    assert_eq!(blows, 1, "the second enemy must be skipped");
}

#[test]
fn clearing_the_level_advances_with_stats_preserved() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 17),
        vec![enemy_at(0, GridPos::new(6, 5), 5)],
        Vec::new(),
    );
    world.player.exp = 2;

    let mut events = Vec::new();
    let slain = engine
        .advance(&world, Intent::Move { dx: 1, dy: 0 }, &mut rng, &mut events)
        .expect("advance");

    assert!(slain.enemies.is_empty());
    assert_eq!(slain.player.exp, 3);
    assert_eq!(slain.message, "YOU DEAL 5pt DAMAGE and SLAIN!");
    assert_eq!(slain.phase, Phase::awaiting(Phase::EnemyAttack { index: 0 }));

    // Acknowledging finds the enemy list empty and generates the next level.
    let mut events = Vec::new();
    let entered = engine
        .advance(&slain, Intent::Acknowledge, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(entered.level, 2);
    assert_eq!(entered.message, "YOU ENTER LEVEL 2!");
    assert_eq!(entered.phase, Phase::awaiting(Phase::PlayerTurn));
    assert_eq!(entered.enemies.len(), engine.config().enemy_count);
    assert_eq!(entered.items.len(), engine.config().item_count);
    assert_eq!(entered.player.hp, Health::new(17), "hit points carry over");
    assert_eq!(entered.player.exp, 3, "experience carries over");
    assert!(events.contains(&Event::LevelEntered { level: 2 }));

    let resting = engine
        .advance(&entered, Intent::Acknowledge, &mut rng, &mut Vec::new())
        .expect("advance");
    assert_eq!(resting.phase, Phase::PlayerTurn);
    assert!(resting.message.is_empty());
}

#[test]
fn a_potion_heals_and_gates_behind_an_ack() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(8, 8), 10)],
        vec![Item {
            id: ItemId::new(0),
            pos: GridPos::new(6, 5),
        }],
    );
    world.player.hp = Health::new(10);

    let mut events = Vec::new();
    let healed = engine
        .advance(&world, Intent::Move { dx: 1, dy: 0 }, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(healed.player.pos, GridPos::new(6, 5));
    assert_eq!(healed.player.hp, Health::new(15));
    assert!(healed.items.is_empty());
    assert_eq!(healed.message, "YOU GET a POTION and HEAL 5pt.");
    assert_eq!(
        healed.phase,
        Phase::awaiting(Phase::EnemyAttack { index: 0 })
    );
    assert!(events.contains(&Event::PotionConsumed {
        item: ItemId::new(0),
        healed: 5,
    }));
}

#[test]
fn healing_clamps_at_the_player_maximum() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(8, 8), 10)],
        vec![Item {
            id: ItemId::new(0),
            pos: GridPos::new(6, 5),
        }],
    );
    world.player.hp = Health::new(18);

    let mut events = Vec::new();
    let healed = engine
        .advance(&world, Intent::Move { dx: 1, dy: 0 }, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(healed.player.hp, Health::new(20));
    assert!(events.contains(&Event::PotionConsumed {
        item: ItemId::new(0),
        healed: 2,
    }));
}

#[test]
fn a_missed_blow_resolves_silently_back_to_the_player() {
    let config = EngineConfig {
        hit_chance: 0.0,
        ..deterministic_config()
    };
    let engine = TurnEngine::new(config);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(6, 5), 10)],
        Vec::new(),
    );
    world.phase = Phase::EnemyAttack { index: 0 };

    let mut events = Vec::new();
    let resting = engine
        .advance(&world, Intent::Idle, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(resting.phase, Phase::PlayerTurn);
    assert!(resting.message.is_empty());
    assert_eq!(resting.player.hp, Health::new(20));
    assert!(events.contains(&Event::AttackMissed {
        enemy: EnemyId::new(0)
    }));
    // The adjacent enemy holds position instead of moving.
    assert_eq!(resting.enemies[0].pos, GridPos::new(6, 5));
}

#[test]
fn enemies_step_toward_the_player_in_the_move_phase() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(8, 8), 10)],
        Vec::new(),
    );
    world.phase = Phase::EnemyMove { index: 0 };

    let mut events = Vec::new();
    let resting = engine
        .advance(&world, Intent::Idle, &mut rng, &mut events)
        .expect("advance");

    assert_eq!(resting.phase, Phase::PlayerTurn);
    assert_eq!(resting.enemies[0].pos, GridPos::new(7, 7));
    assert!(events.contains(&Event::EnemyMoved {
        enemy: EnemyId::new(0),
        from: GridPos::new(8, 8),
        to: GridPos::new(7, 7),
    }));
}

#[test]
fn restart_only_acts_on_the_game_over_screen() {
    let engine = TurnEngine::new(deterministic_config());
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut fallen = sample_world(
        player_at(GridPos::new(5, 5), 2),
        Vec::new(),
        Vec::new(),
    );
    fallen.player.exp = 7;
    fallen.player.hp = Health::new(0);
    fallen.phase = Phase::GameOver;
    fallen.message = "YOU DIED...".to_owned();

    // Everything except a restart is ignored on the game-over screen.
    for intent in [
        Intent::Move { dx: 1, dy: 0 },
        Intent::Acknowledge,
        Intent::Idle,
    ] {
        let unchanged = engine
            .advance(&fallen, intent, &mut rng, &mut Vec::new())
            .expect("advance");
        assert_eq!(unchanged, fallen);
    }

    let mut events = Vec::new();
    let fresh = engine
        .advance(&fallen, Intent::Restart, &mut rng, &mut events)
        .expect("advance");
    assert_eq!(fresh.level, 1);
    assert_eq!(fresh.phase, Phase::PlayerTurn);
    assert_eq!(fresh.player.hp, Health::new(20));
    assert_eq!(fresh.player.exp, 0, "a restart rolls fresh stats");
    assert!(events.contains(&Event::RunRestarted));

    // Outside the game-over screen a restart is a structural no-op.
    let world = sample_world(
        player_at(GridPos::new(5, 5), 20),
        vec![enemy_at(0, GridPos::new(8, 8), 10)],
        Vec::new(),
    );
    let unchanged = engine
        .advance(&world, Intent::Restart, &mut rng, &mut Vec::new())
        .expect("advance");
    assert_eq!(unchanged, world);
}

fn deterministic_config() -> EngineConfig {
    EngineConfig {
        hit_chance: 1.0,
        stumble_chance: 0.0,
        ..EngineConfig::default()
    }
}

fn player_at(pos: GridPos, hp: u32) -> Player {
    Player {
        pos,
        hp: Health::new(hp),
        max_hp: Health::new(20),
        attack: 5,
        exp: 0,
    }
}

fn enemy_at(id: u32, pos: GridPos, hp: u32) -> Enemy {
    Enemy {
        id: EnemyId::new(id),
        pos,
        hp: Health::new(hp),
        attack: 2,
    }
}

fn enemy_with_attack(id: u32, pos: GridPos, attack: u32) -> Enemy {
    Enemy {
        id: EnemyId::new(id),
        pos,
        hp: Health::new(10),
        attack,
    }
}

fn sample_world(player: Player, enemies: Vec<Enemy>, items: Vec<Item>) -> WorldState {
    WorldState {
        level: 1,
        grid: open_room(10, 10),
        player,
        enemies,
        items,
        phase: Phase::PlayerTurn,
        message: String::new(),
    }
}

fn open_room(columns: u32, rows: u32) -> TileGrid {
    let tiles = (0..rows)
        .flat_map(|y| {
            (0..columns).map(move |x| {
                if x == 0 || y == 0 || x == columns - 1 || y == rows - 1 {
                    Tile::Wall
                } else {
                    Tile::Floor
                }
            })
        })
        .collect();
    TileGrid::from_tiles(columns, rows, tiles)
}
