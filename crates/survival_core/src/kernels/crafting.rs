use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::chronicle::Chronicle;
use crate::rejection::Rejection;
use crate::world::{Resource, Skill, World};

/// Craftable items and their wood cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Recipe {
    BasicTool,
    Axe,
    Spear,
    Armor,
}

impl Recipe {
    pub const ALL: [Recipe; 4] = [Recipe::BasicTool, Recipe::Axe, Recipe::Spear, Recipe::Armor];

    pub fn wood_cost(self) -> u32 {
        match self {
            Recipe::BasicTool => 2,
            Recipe::Axe | Recipe::Spear => 4,
            Recipe::Armor => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Recipe::BasicTool => "Basic Tool",
            Recipe::Axe => "Axe",
            Recipe::Spear => "Spear",
            Recipe::Armor => "Armor",
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Recipe {
    type Err = Rejection;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Recipe::ALL
            .into_iter()
            .find(|recipe| recipe.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Rejection::UnknownRecipe(name.to_string()))
    }
}

/// Craft `item` by name.
///
/// The cost is paid before the capacity check, so a full inventory still
/// consumes the wood and returns [`Rejection::InventoryFull`].
pub fn craft_item(
    world: &mut World,
    chronicle: &mut Chronicle,
    item: &str,
) -> Result<Recipe, Rejection> {
    let recipe: Recipe = item.parse()?;
    if !world.stock.try_spend(Resource::Wood, recipe.wood_cost()) {
        return Err(Rejection::NotEnoughWoodToCraft);
    }
    if world.inventory_full() {
        tracing::debug!(%recipe, "crafting cost paid with a full inventory");
        return Err(Rejection::InventoryFull);
    }
    world.inventory.push(recipe);
    chronicle.push(format!("You crafted a {}.", recipe));
    world.skills.train(Skill::Crafting, 1);
    Ok(recipe)
}
