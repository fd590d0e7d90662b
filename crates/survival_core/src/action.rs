//! The player's action surface and its textual command form.
//!
//! Commands are a verb optionally followed by an argument, e.g. `gather_wood`,
//! `craft Basic Tool`, `unlock stoneAge` or `complete 0`. The same text is
//! used on the wire and in batch scripts.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Action {
    GatherWood,
    GatherFood,
    GatherWater,
    EatFood,
    DrinkWater,
    Rest,
    BuildShelter,
    StartFire,
    CraftItem(String),
    Explore,
    RecruitVillager,
    BuildFarm,
    BuildMine,
    BuildWorkshop,
    AttackEnemy,
    DefendEnemy,
    FleeEncounter,
    TradeWoodForFood,
    TradeFoodForTech,
    EndTrade,
    UnlockTechnology(String),
    CompleteTask(usize),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}")]
    UnknownVerb(String),
    #[error("command {0:?} needs an argument")]
    MissingArgument(&'static str),
    #[error("command {0:?} takes no argument")]
    UnexpectedArgument(&'static str),
    #[error("invalid task index {0:?}")]
    InvalidIndex(String),
}

impl Action {
    /// Command verb as used in the textual form.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::GatherWood => "gather_wood",
            Action::GatherFood => "gather_food",
            Action::GatherWater => "gather_water",
            Action::EatFood => "eat_food",
            Action::DrinkWater => "drink_water",
            Action::Rest => "rest",
            Action::BuildShelter => "build_shelter",
            Action::StartFire => "start_fire",
            Action::CraftItem(_) => "craft",
            Action::Explore => "explore",
            Action::RecruitVillager => "recruit_villager",
            Action::BuildFarm => "build_farm",
            Action::BuildMine => "build_mine",
            Action::BuildWorkshop => "build_workshop",
            Action::AttackEnemy => "attack",
            Action::DefendEnemy => "defend",
            Action::FleeEncounter => "flee",
            Action::TradeWoodForFood => "trade_wood_for_food",
            Action::TradeFoodForTech => "trade_food_for_tech",
            Action::EndTrade => "end_trade",
            Action::UnlockTechnology(_) => "unlock",
            Action::CompleteTask(_) => "complete",
        }
    }
}

const BARE_ACTIONS: [Action; 19] = [
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

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CraftItem(item) => write!(f, "{} {}", self.verb(), item),
            Action::UnlockTechnology(id) => write!(f, "{} {}", self.verb(), id),
            Action::CompleteTask(index) => write!(f, "{} {}", self.verb(), index),
            _ => f.write_str(self.verb()),
        }
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(command: &str) -> Result<Self, Self::Err> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ParseActionError::Empty);
        }
        let (verb, argument) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, Some(rest.trim()).filter(|rest| !rest.is_empty())),
            None => (command, None),
        };

        match (verb, argument) {
            ("craft", Some(item)) => Ok(Action::CraftItem(item.to_string())),
            ("craft", None) => Err(ParseActionError::MissingArgument("craft")),
            ("unlock", Some(id)) => Ok(Action::UnlockTechnology(id.to_string())),
            ("unlock", None) => Err(ParseActionError::MissingArgument("unlock")),
            ("complete", Some(index)) => index
                .parse()
                .map(Action::CompleteTask)
                .map_err(|_| ParseActionError::InvalidIndex(index.to_string())),
            ("complete", None) => Err(ParseActionError::MissingArgument("complete")),
            (verb, argument) => {
                let action = BARE_ACTIONS
                    .iter()
                    .find(|action| action.verb() == verb)
                    .ok_or_else(|| ParseActionError::UnknownVerb(verb.to_string()))?;
                if argument.is_some() {
                    return Err(ParseActionError::UnexpectedArgument(action.verb()));
                }
                Ok(action.clone())
            }
        }
    }
}
