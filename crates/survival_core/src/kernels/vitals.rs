use crate::chronicle::Chronicle;
use crate::fixed::commit_vital_delta;
use crate::rejection::Rejection;
use crate::world::{Resource, World};

const HUNGER_DECAY: i32 = 3;
const THIRST_DECAY: i32 = 3;
const ENERGY_DECAY: i32 = 2;

/// Hunger or thirst below this level starts costing health.
pub const NEED_DANGER_THRESHOLD: u8 = 20;
/// Temperatures below this hurt the player unless a fire is lit.
pub const COLD_THRESHOLD: i32 = 10;

const STARVATION_DAMAGE: i32 = 2;
const DEHYDRATION_DAMAGE: i32 = 2;
const COLD_DAMAGE: i32 = 3;

const MEAL_RESTORE: i32 = 20;
const REST_RESTORE: i32 = 30;
const SHELTER_REST_BONUS: i32 = 10;

/// Apply one decay tick to the player's needs and the resulting penalties.
///
/// Penalties are read from the needs after this tick's decay and stack.
pub fn decay(world: &mut World) {
    let vitals = &mut world.vitals;
    vitals.hunger = commit_vital_delta(vitals.hunger, -HUNGER_DECAY);
    vitals.thirst = commit_vital_delta(vitals.thirst, -THIRST_DECAY);
    vitals.energy = commit_vital_delta(vitals.energy, -ENERGY_DECAY);

    let mut damage = 0;
    if vitals.hunger < NEED_DANGER_THRESHOLD {
        damage += STARVATION_DAMAGE;
    }
    if vitals.thirst < NEED_DANGER_THRESHOLD {
        damage += DEHYDRATION_DAMAGE;
    }
    if world.environment.temperature() < COLD_THRESHOLD && !world.shelter.fire_lit {
        damage += COLD_DAMAGE;
    }
    if damage > 0 {
        vitals.health = commit_vital_delta(vitals.health, -damage);
        tracing::debug!(damage, health = vitals.health, "decay penalties applied");
    }
}

pub fn eat_food(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if !world.stock.try_spend(Resource::Food, 1) {
        return Err(Rejection::NoFood);
    }
    world.vitals.hunger = commit_vital_delta(world.vitals.hunger, MEAL_RESTORE);
    chronicle.push("You ate food and restored hunger.");
    Ok(())
}

pub fn drink_water(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if !world.stock.try_spend(Resource::Water, 1) {
        return Err(Rejection::NoWater);
    }
    world.vitals.thirst = commit_vital_delta(world.vitals.thirst, MEAL_RESTORE);
    chronicle.push("You drank water and quenched your thirst.");
    Ok(())
}

pub fn rest(world: &mut World, chronicle: &mut Chronicle) {
    let bonus = if world.shelter.built {
        SHELTER_REST_BONUS
    } else {
        0
    };
    world.vitals.energy = commit_vital_delta(world.vitals.energy, REST_RESTORE + bonus);
    chronicle.push("You rested and regained energy.");
}
