pub mod action;
pub mod chronicle;
pub mod fixed;
pub mod io;
pub mod kernels;
pub mod rejection;
pub mod rng;
pub mod schedule;
pub mod world;

use std::time::Duration;

use serde::Serialize;

use action::Action;
use chronicle::Chronicle;
use kernels::crafting::Recipe;
use kernels::{crafting, economy, encounter, environment, tech, vitals};
use rejection::Rejection;
use rng::{RandomSource, Stream};
use schedule::{Firing, Schedule, Timer};
use world::World;

/// Owns the world, the random source and the chronicle.
///
/// Every timer handler and action takes `&mut self` and runs to completion,
/// so callers always observe the most recently committed state. Rejected
/// actions leave the world untouched and write their reason to the
/// chronicle.
#[derive(Clone, Debug)]
pub struct Engine<R = Stream> {
    world: World,
    rng: R,
    chronicle: Chronicle,
}

/// Read-only view handed to presentation layers.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    #[serde(flatten)]
    pub world: &'a World,
    pub log: &'a Chronicle,
}

impl<R: RandomSource> Engine<R> {
    /// Start a game from `world`, with the opening line in the chronicle.
    pub fn new(world: World, rng: R) -> Self {
        Self::with_chronicle(world, rng, Chronicle::opening())
    }

    pub fn with_chronicle(world: World, rng: R, chronicle: Chronicle) -> Self {
        Self {
            world,
            rng,
            chronicle,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn chronicle(&self) -> &Chronicle {
        &self.chronicle
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            world: &self.world,
            log: &self.chronicle,
        }
    }

    /// Run one timer handler.
    pub fn tick(&mut self, timer: Timer) {
        tracing::debug!(%timer, hour = self.world.environment.hour(), "timer fired");
        match timer {
            Timer::Decay => {
                vitals::decay(&mut self.world);
                environment::advance_hour(&mut self.world);
            }
            Timer::Weather => {
                environment::reroll_weather(&mut self.world, &mut self.rng, &mut self.chronicle);
            }
            Timer::EncounterRoll => {
                encounter::roll_periodic(&mut self.world, &mut self.rng, &mut self.chronicle);
            }
        }
    }

    /// Advance `schedule` by `elapsed` and run every firing in order.
    pub fn advance(&mut self, schedule: &mut Schedule, elapsed: Duration) -> Vec<Firing> {
        let firings = schedule.advance(elapsed);
        for firing in &firings {
            self.tick(firing.timer);
        }
        firings
    }

    /// Dispatch a command from the action surface.
    pub fn apply(&mut self, action: &Action) -> Result<(), Rejection> {
        match action {
            Action::GatherWood => {
                self.gather_wood();
                Ok(())
            }
            Action::GatherFood => {
                self.gather_food();
                Ok(())
            }
            Action::GatherWater => {
                self.gather_water();
                Ok(())
            }
            Action::EatFood => self.eat_food(),
            Action::DrinkWater => self.drink_water(),
            Action::Rest => {
                self.rest();
                Ok(())
            }
            Action::BuildShelter => self.build_shelter(),
            Action::StartFire => self.start_fire(),
            Action::CraftItem(item) => self.craft_item(item).map(|_| ()),
            Action::Explore => {
                self.explore();
                Ok(())
            }
            Action::RecruitVillager => self.recruit_villager(),
            Action::BuildFarm => self.build_farm(),
            Action::BuildMine => self.build_mine(),
            Action::BuildWorkshop => self.build_workshop(),
            Action::AttackEnemy => self.attack_enemy(),
            Action::DefendEnemy => self.defend_enemy(),
            Action::FleeEncounter => self.flee_encounter().map(|_| ()),
            Action::TradeWoodForFood => self.trade_wood_for_food(),
            Action::TradeFoodForTech => self.trade_food_for_tech(),
            Action::EndTrade => self.end_trade(),
            Action::UnlockTechnology(id) => self.unlock_technology(id),
            Action::CompleteTask(index) => self.complete_task(*index),
        }
    }

    fn settle<T>(&mut self, result: Result<T, Rejection>) -> Result<T, Rejection> {
        if let Err(rejection) = &result {
            tracing::debug!(?rejection, "action rejected");
            self.chronicle.push(rejection.to_string());
        }
        result
    }

    pub fn gather_wood(&mut self) -> u32 {
        economy::gather_wood(&mut self.world, &mut self.chronicle)
    }

    pub fn gather_food(&mut self) -> u32 {
        economy::gather_food(&mut self.world, &mut self.chronicle)
    }

    pub fn gather_water(&mut self) -> u32 {
        economy::gather_water(&mut self.world, &mut self.chronicle)
    }

    pub fn eat_food(&mut self) -> Result<(), Rejection> {
        let result = vitals::eat_food(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn drink_water(&mut self) -> Result<(), Rejection> {
        let result = vitals::drink_water(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn rest(&mut self) {
        vitals::rest(&mut self.world, &mut self.chronicle);
    }

    pub fn build_shelter(&mut self) -> Result<(), Rejection> {
        let result = economy::build_shelter(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn start_fire(&mut self) -> Result<(), Rejection> {
        let result = economy::start_fire(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn craft_item(&mut self, item: &str) -> Result<Recipe, Rejection> {
        let result = crafting::craft_item(&mut self.world, &mut self.chronicle, item);
        self.settle(result)
    }

    /// Returns whether the expedition ran into an encounter.
    pub fn explore(&mut self) -> bool {
        encounter::explore(&mut self.world, &mut self.rng, &mut self.chronicle)
    }

    pub fn recruit_villager(&mut self) -> Result<(), Rejection> {
        let result = economy::recruit_villager(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn build_farm(&mut self) -> Result<(), Rejection> {
        let result = economy::build_farm(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn build_mine(&mut self) -> Result<(), Rejection> {
        let result = economy::build_mine(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn build_workshop(&mut self) -> Result<(), Rejection> {
        let result = economy::build_workshop(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn attack_enemy(&mut self) -> Result<(), Rejection> {
        let result = encounter::attack(&mut self.world, &mut self.rng, &mut self.chronicle);
        self.settle(result)
    }

    pub fn defend_enemy(&mut self) -> Result<(), Rejection> {
        let result = encounter::defend(&mut self.world, &mut self.rng, &mut self.chronicle);
        self.settle(result)
    }

    /// Returns whether the escape succeeded.
    pub fn flee_encounter(&mut self) -> Result<bool, Rejection> {
        let result = encounter::flee(&mut self.world, &mut self.rng, &mut self.chronicle);
        self.settle(result)
    }

    pub fn trade_wood_for_food(&mut self) -> Result<(), Rejection> {
        let result = encounter::trade_wood_for_food(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn trade_food_for_tech(&mut self) -> Result<(), Rejection> {
        let result = encounter::trade_food_for_tech(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn end_trade(&mut self) -> Result<(), Rejection> {
        let result = encounter::end_trade(&mut self.world, &mut self.chronicle);
        self.settle(result)
    }

    pub fn unlock_technology(&mut self, id: &str) -> Result<(), Rejection> {
        let result = tech::unlock_technology(&mut self.world, &mut self.chronicle, id);
        self.settle(result)
    }

    pub fn complete_task(&mut self, index: usize) -> Result<(), Rejection> {
        let result = tech::complete_task(&mut self.world, &mut self.chronicle, index);
        self.settle(result)
    }
}
