#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat resolution shared by the player and enemy phases.

use delve_core::{AttackOutcome, GridPos, Health, ItemId};
use delve_world::Item;
use rand::Rng;

/// Resolves a single blow against a defender.
///
/// The full attack value is subtracted from the defender's health, saturating
/// at the zero death floor; the outcome reports the attack value as damage
/// dealt and whether the defender died. Deterministic, no randomness.
#[must_use]
pub fn resolve_attack(attack: u32, defender_hp: Health) -> AttackOutcome {
    let remaining = defender_hp.damage(attack);
    AttackOutcome {
        damage: attack,
        remaining,
        slain: remaining.is_depleted(),
    }
}

/// Draws a single Bernoulli trial from the shared rng stream.
///
/// The only randomized combat decision: enemy attacks pass it their
/// configured hit chance. `probability` must lie in `[0, 1]`.
pub fn resolve_hit_chance(probability: f64, rng: &mut impl Rng) -> bool {
    rng.gen_bool(probability)
}

/// Resolves an item pickup for the tile the player just entered.
///
/// Pure lookup: at most one item rests on any tile, so at most one pickup can
/// follow a move. The caller removes the item and applies the healing.
#[must_use]
pub fn resolve_pickup(pos: GridPos, items: &[Item]) -> Option<ItemId> {
    items.iter().find(|item| item.pos == pos).map(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::{resolve_attack, resolve_hit_chance, resolve_pickup};
    use delve_core::{AttackOutcome, GridPos, Health, ItemId};
    use delve_world::Item;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn a_surviving_defender_keeps_the_remainder() {
        assert_eq!(
            resolve_attack(5, Health::new(10)),
            AttackOutcome {
                damage: 5,
                remaining: Health::new(5),
                slain: false,
            }
        );
    }

    #[test]
    fn an_exact_blow_slays_the_defender() {
        let outcome = resolve_attack(5, Health::new(5));
        assert!(outcome.slain);
        assert_eq!(outcome.remaining, Health::new(0));
    }

    #[test]
    fn overkill_damage_reports_the_full_attack() {
        let outcome = resolve_attack(5, Health::new(2));
        assert_eq!(outcome.damage, 5);
        assert_eq!(outcome.remaining, Health::new(0));
        assert!(outcome.slain);
    }

    #[test]
    fn degenerate_hit_chances_are_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(resolve_hit_chance(1.0, &mut rng));
        assert!(!resolve_hit_chance(0.0, &mut rng));
    }

    #[test]
    fn identical_seeds_draw_identical_hit_sequences() {
        let mut first = ChaCha8Rng::seed_from_u64(21);
        let mut second = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..32 {
            assert_eq!(
                resolve_hit_chance(0.9, &mut first),
                resolve_hit_chance(0.9, &mut second)
            );
        }
    }

    #[test]
    fn pickup_matches_only_the_entered_tile() {
        let items = vec![
            Item {
                id: ItemId::new(0),
                pos: GridPos::new(4, 4),
            },
            Item {
                id: ItemId::new(1),
                pos: GridPos::new(6, 2),
            },
        ];
        assert_eq!(
            resolve_pickup(GridPos::new(6, 2), &items),
            Some(ItemId::new(1))
        );
        assert_eq!(resolve_pickup(GridPos::new(5, 5), &items), None);
    }
}
