use thiserror::Error;

use crate::world::Resource;

/// Why an action left the world untouched.
///
/// The `Display` text is what the player sees in the chronicle.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("No food available!")]
    NoFood,
    #[error("No water available!")]
    NoWater,
    #[error("Not enough wood or shelter already built.")]
    ShelterUnavailable,
    #[error("Not enough wood or fire already burning.")]
    FireUnavailable,
    #[error("Not enough wood to craft.")]
    NotEnoughWoodToCraft,
    /// Raised after the recipe cost was already paid.
    #[error("Inventory is full!")]
    InventoryFull,
    #[error("Unknown recipe {0}.")]
    UnknownRecipe(String),
    #[error("Not enough food to recruit a villager.")]
    NotEnoughFoodToRecruit,
    #[error("Not enough wood to build a {0}.")]
    NotEnoughWoodToBuild(&'static str),
    #[error("There is nothing to fight.")]
    NoHostileEncounter,
    #[error("There is no trader here.")]
    NoTrader,
    #[error("Not enough {0} to trade.")]
    NotEnoughToTrade(Resource),
    #[error("Unknown technology {0}.")]
    UnknownTechnology(String),
    #[error("Not enough research points or already unlocked.")]
    TechnologyUnavailable,
    #[error("No task at position {0}.")]
    UnknownTask(usize),
    #[error("Task not yet completed!")]
    TaskIncomplete,
}
