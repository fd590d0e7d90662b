use std::collections::BTreeSet;

use proptest::prelude::*;

use survival_core::action::Action;
use survival_core::fixed::VITAL_MAX;
use survival_core::io::seed::{build_world, Seed, Start};
use survival_core::rng::Stream;
use survival_core::schedule::Timer;
use survival_core::world::{Encounter, World};
use survival_core::Engine;

#[derive(Clone, Debug)]
enum Step {
    Act(Action),
    Tick(Timer),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let bare = vec![
        Action::GatherWood,
        Action::GatherFood,
        Action::GatherWater,
        Action::EatFood,
        Action::DrinkWater,
        Action::Rest,
        Action::BuildShelter,
        Action::StartFire,
        Action::Explore,
        Action::RecruitVillager,
        Action::BuildFarm,
        Action::BuildMine,
        Action::BuildWorkshop,
        Action::AttackEnemy,
        Action::DefendEnemy,
        Action::FleeEncounter,
        Action::TradeWoodForFood,
        Action::TradeFoodForTech,
        Action::EndTrade,
    ];
    prop_oneof![
        8 => prop::sample::select(bare),
        1 => prop::sample::select(vec!["Basic Tool", "Axe", "Spear", "Armor", "Sling"])
            .prop_map(|item| Action::CraftItem(item.to_string())),
        1 => prop::sample::select(vec!["stoneAge", "diplomacy", "metallurgy", "unknown"])
            .prop_map(|id| Action::UnlockTechnology(id.to_string())),
        1 => (0usize..3).prop_map(Action::CompleteTask),
    ]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => action_strategy().prop_map(Step::Act),
        1 => prop::sample::select(Timer::ALL.to_vec()).prop_map(Step::Tick),
    ]
}

fn rich_world() -> World {
    let seed = Seed {
        start: Start {
            wood: 30,
            food: 12,
            water: 6,
            ..Start::default()
        },
        ..Seed::default()
    };
    build_world(&seed)
}

fn check_bounds(world: &World) -> Result<(), TestCaseError> {
    let vitals = &world.vitals;
    for value in [vitals.health, vitals.hunger, vitals.thirst, vitals.energy] {
        prop_assert!(value <= VITAL_MAX);
    }
    prop_assert!(world.inventory.len() <= world.inventory_capacity);
    prop_assert!(world.environment.hour() < 24);
    if let Some(Encounter::Hostile { enemy_health, .. }) = world.encounter {
        prop_assert!(enemy_health > 0);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_across_random_play(
        rng_seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..200),
    ) {
        let mut engine = Engine::new(rich_world(), Stream::from_seed(rng_seed));
        let mut unlocked = BTreeSet::new();
        let mut completed = BTreeSet::new();
        let mut had_shelter = false;
        let mut had_fire = false;

        for step in steps {
            let before = engine.world().clone();
            match &step {
                Step::Act(action) => {
                    let _ = engine.apply(action);
                }
                Step::Tick(timer) => engine.tick(*timer),
            }
            let world = engine.world();
            check_bounds(world)?;
            prop_assert!(engine.chronicle().len() <= 10);

            prop_assert!(world.skills.gathering >= before.skills.gathering);
            prop_assert!(world.skills.crafting >= before.skills.crafting);
            prop_assert!(world.skills.combat >= before.skills.combat);
            prop_assert!(world.skills.exploration >= before.skills.exploration);

            had_shelter |= world.shelter.built;
            had_fire |= world.shelter.fire_lit;
            prop_assert_eq!(world.shelter.built, had_shelter);
            prop_assert_eq!(world.shelter.fire_lit, had_fire);

            for (id, tech) in &world.technologies {
                if tech.unlocked {
                    unlocked.insert(id.clone());
                }
                prop_assert_eq!(tech.unlocked, unlocked.contains(id));
            }

            for task in &world.tasks {
                prop_assert!(!completed.contains(&task.description));
                let previous = before
                    .tasks
                    .iter()
                    .find(|t| t.description == task.description);
                if let Some(previous) = previous {
                    prop_assert!(task.progress >= previous.progress);
                }
            }
            for task in &before.tasks {
                if !world.tasks.iter().any(|t| t.description == task.description) {
                    completed.insert(task.description.clone());
                }
            }

            if before.encounter.is_some() && world.encounter.is_some() {
                let same_kind = std::mem::discriminant(before.encounter.as_ref().unwrap())
                    == std::mem::discriminant(world.encounter.as_ref().unwrap());
                prop_assert!(same_kind, "encounter replaced while live");
            }
        }
    }
}
