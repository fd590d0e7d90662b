//! Encounter state machine: arrivals, combat and trading.
//!
//! At most one encounter is live at a time. Arrivals only happen while
//! [`World::encounter`] is `None`; every action that resolves an encounter
//! puts it back to `None`.

use crate::chronicle::Chronicle;
use crate::fixed::{commit_vital_delta, skill_bonus};
use crate::kernels::tech::earn_research;
use crate::rejection::Rejection;
use crate::rng::RandomSource;
use crate::world::{Encounter, EnemyKind, Resource, Skill, World};

const ATTACK_BASE_DAMAGE: u32 = 5;
const ATTACK_COMBAT_TRAINING: u32 = 2;
const VICTORY_RESEARCH: u32 = 3;

const ENEMY_BASE_DAMAGE: u32 = 3;
const ENEMY_DAMAGE_SPREAD: u32 = 3;
const GUARDED_BASE_DAMAGE: u32 = 1;
const GUARDED_DAMAGE_SPREAD: u32 = 2;

const FLEE_CHANCE: f64 = 0.5;

const TRADE_WOOD_PRICE: u32 = 2;
const TRADE_FOOD_PRICE: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visitor {
    Raider,
    WildAnimal,
    Trader,
}

impl Visitor {
    fn encounter(self) -> Encounter {
        match self {
            Visitor::Raider => Encounter::hostile(EnemyKind::Raider),
            Visitor::WildAnimal => Encounter::hostile(EnemyKind::WildAnimal),
            Visitor::Trader => Encounter::Trader,
        }
    }
}

struct Arrival {
    below: f64,
    visitor: Visitor,
    message: &'static str,
}

/// Chance of an arrival plus the cumulative bands the second draw falls into.
struct ArrivalTable {
    chance: f64,
    bands: [Arrival; 3],
}

impl ArrivalTable {
    fn pick(&self, roll: f64) -> &Arrival {
        self.bands
            .iter()
            .find(|band| roll < band.below)
            .unwrap_or(&self.bands[self.bands.len() - 1])
    }
}

/// Arrivals rolled by the periodic encounter timer.
const PERIODIC_ARRIVALS: ArrivalTable = ArrivalTable {
    chance: 0.2,
    bands: [
        Arrival {
            below: 0.5,
            visitor: Visitor::Raider,
            message: "Raiders have ambushed you!",
        },
        Arrival {
            below: 0.8,
            visitor: Visitor::Trader,
            message: "A trader has arrived in your village.",
        },
        Arrival {
            below: 1.0,
            visitor: Visitor::WildAnimal,
            message: "A wild animal is prowling nearby!",
        },
    ],
};

/// Arrivals rolled while exploring. Animals are more common than traders here.
const EXPLORATION_ARRIVALS: ArrivalTable = ArrivalTable {
    chance: 0.3,
    bands: [
        Arrival {
            below: 0.5,
            visitor: Visitor::Raider,
            message: "Raiders ambush you during exploration!",
        },
        Arrival {
            below: 0.8,
            visitor: Visitor::WildAnimal,
            message: "A wild animal attacks you!",
        },
        Arrival {
            below: 1.0,
            visitor: Visitor::Trader,
            message: "You meet a wandering trader.",
        },
    ],
};

fn try_arrival<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
    table: &ArrivalTable,
) -> bool {
    if world.encounter.is_some() || !rng.chance(table.chance) {
        return false;
    }
    let arrival = table.pick(rng.next_f64());
    let encounter = arrival.visitor.encounter();
    tracing::debug!(?encounter, "encounter began");
    world.encounter = Some(encounter);
    chronicle.push(arrival.message);
    true
}

/// Encounter timer handler. Returns whether an encounter began.
pub fn roll_periodic<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
) -> bool {
    try_arrival(world, rng, chronicle, &PERIODIC_ARRIVALS)
}

/// Venture out: trains exploration, improves farm output and may run into
/// something. Returns whether an encounter began.
pub fn explore<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
) -> bool {
    chronicle.push("You venture into unknown lands.");
    world.skills.train(Skill::Exploration, 1);
    world.village.production.farm += 1;
    try_arrival(world, rng, chronicle, &EXPLORATION_ARRIVALS)
}

fn hostile(world: &World) -> Result<(EnemyKind, u32), Rejection> {
    match world.encounter {
        Some(Encounter::Hostile { kind, enemy_health }) => Ok((kind, enemy_health)),
        _ => Err(Rejection::NoHostileEncounter),
    }
}

fn require_trader(world: &World) -> Result<(), Rejection> {
    match world.encounter {
        Some(Encounter::Trader) => Ok(()),
        _ => Err(Rejection::NoTrader),
    }
}

fn enemy_strike<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
    kind: EnemyKind,
) -> u32 {
    let damage = ENEMY_BASE_DAMAGE + rng.below(ENEMY_DAMAGE_SPREAD);
    world.vitals.health = commit_vital_delta(world.vitals.health, -(damage as i32));
    chronicle.push(format!("The {} attacks you for {} damage.", kind, damage));
    damage
}

/// Strike the enemy. A surviving enemy hits back.
pub fn attack<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
) -> Result<(), Rejection> {
    let (kind, enemy_health) = hostile(world)?;
    let damage = ATTACK_BASE_DAMAGE + skill_bonus(world.skills.combat);
    chronicle.push(format!("You attack the {} for {} damage.", kind, damage));
    world.skills.train(Skill::Combat, ATTACK_COMBAT_TRAINING);

    if damage >= enemy_health {
        world.encounter = None;
        tracing::debug!(%kind, "encounter won");
        chronicle.push(format!("You defeated the {}!", kind));
        earn_research(world, chronicle, VICTORY_RESEARCH);
    } else {
        world.encounter = Some(Encounter::Hostile {
            kind,
            enemy_health: enemy_health - damage,
        });
        enemy_strike(world, rng, chronicle, kind);
    }
    Ok(())
}

/// Brace against the enemy, taking reduced damage.
pub fn defend<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
) -> Result<(), Rejection> {
    hostile(world)?;
    chronicle.push("You brace yourself and reduce the incoming damage.");
    let damage = GUARDED_BASE_DAMAGE + rng.below(GUARDED_DAMAGE_SPREAD);
    world.vitals.health = commit_vital_delta(world.vitals.health, -(damage as i32));
    chronicle.push(format!("You only took {} damage while defending.", damage));
    Ok(())
}

/// Attempt to escape. Returns whether the escape succeeded.
pub fn flee<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
) -> Result<bool, Rejection> {
    let (kind, _) = hostile(world)?;
    if rng.chance(FLEE_CHANCE) {
        world.encounter = None;
        tracing::debug!(%kind, "encounter escaped");
        chronicle.push("You successfully fled from the encounter.");
        Ok(true)
    } else {
        chronicle.push("You failed to escape! The enemy attacks.");
        enemy_strike(world, rng, chronicle, kind);
        Ok(false)
    }
}

pub fn trade_wood_for_food(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    require_trader(world)?;
    if !world.stock.try_spend(Resource::Wood, TRADE_WOOD_PRICE) {
        return Err(Rejection::NotEnoughToTrade(Resource::Wood));
    }
    world.stock.credit(Resource::Food, 1);
    chronicle.push("Traded 2 wood for 1 food.");
    Ok(())
}

pub fn trade_food_for_tech(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    require_trader(world)?;
    if !world.stock.try_spend(Resource::Food, TRADE_FOOD_PRICE) {
        return Err(Rejection::NotEnoughToTrade(Resource::Food));
    }
    world.credit_research(1);
    chronicle.push("Traded 2 food for 1 research point.");
    Ok(())
}

pub fn end_trade(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    require_trader(world)?;
    world.encounter = None;
    chronicle.push("Ended trade with trader.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Scripted;

    fn raider(enemy_health: u32) -> Option<Encounter> {
        Some(Encounter::Hostile {
            kind: EnemyKind::Raider,
            enemy_health,
        })
    }

    #[test]
    fn periodic_table_orders_trader_before_animal() {
        let cases = [
            (0.49, Encounter::hostile(EnemyKind::Raider)),
            (0.5, Encounter::Trader),
            (0.79, Encounter::Trader),
            (0.8, Encounter::hostile(EnemyKind::WildAnimal)),
        ];
        for (roll, expected) in cases {
            let mut world = World::default();
            let mut chronicle = Chronicle::new();
            let mut rng = Scripted::new([0.1, roll]);
            assert!(roll_periodic(&mut world, &mut rng, &mut chronicle));
            assert_eq!(world.encounter, Some(expected));
        }
    }

    #[test]
    fn exploration_table_orders_animal_before_trader() {
        let cases = [
            (0.2, Encounter::hostile(EnemyKind::Raider)),
            (0.6, Encounter::hostile(EnemyKind::WildAnimal)),
            (0.9, Encounter::Trader),
        ];
        for (roll, expected) in cases {
            let mut world = World::default();
            let mut chronicle = Chronicle::new();
            let mut rng = Scripted::new([0.29, roll]);
            assert!(explore(&mut world, &mut rng, &mut chronicle));
            assert_eq!(world.encounter, Some(expected));
            assert_eq!(world.skills.exploration, 1);
            assert_eq!(world.village.production.farm, 1);
        }
    }

    #[test]
    fn missed_roll_leaves_no_encounter() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        let mut rng = Scripted::new([0.2]);
        assert!(!roll_periodic(&mut world, &mut rng, &mut chronicle));
        assert!(world.encounter.is_none());
        let mut rng = Scripted::new([0.3]);
        assert!(!explore(&mut world, &mut rng, &mut chronicle));
        assert!(world.encounter.is_none());
        assert_eq!(world.skills.exploration, 1);
    }

    #[test]
    fn live_encounter_blocks_arrivals_without_drawing() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.encounter = Some(Encounter::Trader);
        let mut rng = Scripted::new([0.0]);
        assert!(!roll_periodic(&mut world, &mut rng, &mut chronicle));
        assert!(!explore(&mut world, &mut rng, &mut chronicle));
        assert_eq!(world.encounter, Some(Encounter::Trader));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn killing_blow_ends_encounter_and_pays_research() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.encounter = raider(3);
        let mut rng = Scripted::new([0.0]);
        attack(&mut world, &mut rng, &mut chronicle).expect("hostile encounter");
        assert!(world.encounter.is_none());
        assert_eq!(world.research_points, 3);
        assert_eq!(world.skills.combat, 2);
        assert_eq!(world.vitals.health, 100);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn surviving_enemy_strikes_back() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.encounter = raider(50);
        world.skills.combat = 10;
        let mut rng = Scripted::new([0.99]);
        attack(&mut world, &mut rng, &mut chronicle).expect("hostile encounter");
        assert_eq!(world.encounter, raider(44));
        assert_eq!(world.vitals.health, 95);
        assert_eq!(world.skills.combat, 12);
        assert_eq!(chronicle.latest(), Some("The raider attacks you for 5 damage."));
    }

    #[test]
    fn defending_takes_reduced_damage() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.encounter = raider(20);
        let mut rng = Scripted::new([0.0, 0.7]);
        defend(&mut world, &mut rng, &mut chronicle).expect("hostile encounter");
        defend(&mut world, &mut rng, &mut chronicle).expect("hostile encounter");
        assert_eq!(world.vitals.health, 100 - 1 - 2);
        assert_eq!(world.encounter, raider(20));
    }

    #[test]
    fn fleeing_is_a_coin_flip() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.encounter = raider(20);
        let mut rng = Scripted::new([0.6, 0.0, 0.4]);
        assert_eq!(flee(&mut world, &mut rng, &mut chronicle), Ok(false));
        assert_eq!(world.vitals.health, 97);
        assert_eq!(world.encounter, raider(20));
        assert_eq!(flee(&mut world, &mut rng, &mut chronicle), Ok(true));
        assert!(world.encounter.is_none());
    }

    #[test]
    fn combat_actions_need_a_hostile() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        let mut rng = Scripted::new([0.0]);
        world.encounter = Some(Encounter::Trader);
        assert_eq!(
            attack(&mut world, &mut rng, &mut chronicle),
            Err(Rejection::NoHostileEncounter)
        );
        assert_eq!(
            defend(&mut world, &mut rng, &mut chronicle),
            Err(Rejection::NoHostileEncounter)
        );
        assert_eq!(
            flee(&mut world, &mut rng, &mut chronicle),
            Err(Rejection::NoHostileEncounter)
        );
        assert_eq!(world.encounter, Some(Encounter::Trader));
        assert_eq!(world.skills.combat, 0);
        assert_eq!(world.vitals.health, 100);
    }

    #[test]
    fn trading_with_a_trader() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.encounter = Some(Encounter::Trader);
        world.stock.wood = 3;
        world.stock.food = 1;

        trade_wood_for_food(&mut world, &mut chronicle).expect("enough wood");
        assert_eq!(world.stock.wood, 1);
        assert_eq!(world.stock.food, 2);
        assert_eq!(
            trade_wood_for_food(&mut world, &mut chronicle),
            Err(Rejection::NotEnoughToTrade(Resource::Wood))
        );

        trade_food_for_tech(&mut world, &mut chronicle).expect("enough food");
        assert_eq!(world.stock.food, 0);
        assert_eq!(world.research_points, 1);

        end_trade(&mut world, &mut chronicle).expect("trader present");
        assert!(world.encounter.is_none());
    }

    #[test]
    fn trading_needs_a_trader() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.stock.wood = 10;
        world.stock.food = 10;
        assert_eq!(
            trade_wood_for_food(&mut world, &mut chronicle),
            Err(Rejection::NoTrader)
        );
        world.encounter = raider(10);
        assert_eq!(
            trade_food_for_tech(&mut world, &mut chronicle),
            Err(Rejection::NoTrader)
        );
        assert_eq!(end_trade(&mut world, &mut chronicle), Err(Rejection::NoTrader));
        assert_eq!(world.encounter, raider(10));
        assert_eq!(world.stock.wood, 10);
        assert_eq!(world.stock.food, 10);
    }
}
