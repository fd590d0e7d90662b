//! Gathering, construction and recruitment.

use crate::chronicle::Chronicle;
use crate::fixed::skill_bonus;
use crate::kernels::tech::advance_tasks;
use crate::rejection::Rejection;
use crate::world::{Resource, Skill, World};

pub const SHELTER_COST: u32 = 10;
pub const FIRE_COST: u32 = 3;
pub const FARM_COST: u32 = 5;
pub const MINE_COST: u32 = 5;
pub const WORKSHOP_COST: u32 = 8;
pub const VILLAGER_COST: u32 = 3;

const BUILDING_PRODUCTION: u32 = 2;
const VILLAGER_PRODUCTION: u32 = 1;

fn gather(
    world: &mut World,
    chronicle: &mut Chronicle,
    resource: Resource,
    amount: u32,
) -> u32 {
    world.stock.credit(resource, amount);
    chronicle.push(format!("You gathered {} {}.", amount, resource));
    world.skills.train(Skill::Gathering, 1);
    advance_tasks(world, resource, amount);
    amount
}

/// Returns the amount of wood collected.
pub fn gather_wood(world: &mut World, chronicle: &mut Chronicle) -> u32 {
    let amount = 1 + skill_bonus(world.skills.gathering);
    gather(world, chronicle, Resource::Wood, amount)
}

pub fn gather_food(world: &mut World, chronicle: &mut Chronicle) -> u32 {
    gather(world, chronicle, Resource::Food, 1)
}

pub fn gather_water(world: &mut World, chronicle: &mut Chronicle) -> u32 {
    gather(world, chronicle, Resource::Water, 1)
}

pub fn build_shelter(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if world.shelter.built || !world.stock.try_spend(Resource::Wood, SHELTER_COST) {
        return Err(Rejection::ShelterUnavailable);
    }
    world.shelter.built = true;
    chronicle.push("You built a shelter.");
    Ok(())
}

pub fn start_fire(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if world.shelter.fire_lit || !world.stock.try_spend(Resource::Wood, FIRE_COST) {
        return Err(Rejection::FireUnavailable);
    }
    world.shelter.fire_lit = true;
    chronicle.push("You started a fire.");
    Ok(())
}

pub fn build_farm(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if !world.stock.try_spend(Resource::Wood, FARM_COST) {
        return Err(Rejection::NotEnoughWoodToBuild("farm"));
    }
    let village = &mut world.village;
    village.buildings.farm += 1;
    village.production.farm += BUILDING_PRODUCTION;
    chronicle.push("You built a farm.");
    Ok(())
}

pub fn build_mine(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if !world.stock.try_spend(Resource::Wood, MINE_COST) {
        return Err(Rejection::NotEnoughWoodToBuild("mine"));
    }
    let village = &mut world.village;
    village.buildings.mine += 1;
    village.production.mine += BUILDING_PRODUCTION;
    chronicle.push("You built a mine.");
    Ok(())
}

pub fn build_workshop(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if !world.stock.try_spend(Resource::Wood, WORKSHOP_COST) {
        return Err(Rejection::NotEnoughWoodToBuild("workshop"));
    }
    world.village.buildings.workshop += 1;
    chronicle.push("You built a workshop, boosting crafting efficiency.");
    Ok(())
}

pub fn recruit_villager(world: &mut World, chronicle: &mut Chronicle) -> Result<(), Rejection> {
    if !world.stock.try_spend(Resource::Food, VILLAGER_COST) {
        return Err(Rejection::NotEnoughFoodToRecruit);
    }
    let village = &mut world.village;
    village.villagers += 1;
    village.production.farm += VILLAGER_PRODUCTION;
    village.production.mine += VILLAGER_PRODUCTION;
    chronicle.push("You recruited a new villager.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Task;

    fn wood_task() -> Task {
        Task {
            description: "Gather 10 wood".to_string(),
            objective: Resource::Wood,
            goal: 10,
            progress: 0,
            reward: 2,
        }
    }

    #[test]
    fn gather_wood_scales_with_skill_and_feeds_tasks() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.tasks.push(wood_task());
        world.skills.gathering = 20;

        assert_eq!(gather_wood(&mut world, &mut chronicle), 3);
        assert_eq!(world.stock.wood, 3);
        assert_eq!(world.skills.gathering, 21);
        assert_eq!(world.tasks[0].progress, 3);
        assert_eq!(chronicle.latest(), Some("You gathered 3 wood."));
    }

    #[test]
    fn food_and_water_yield_one() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.skills.gathering = 50;
        world.tasks.push(wood_task());
        assert_eq!(gather_food(&mut world, &mut chronicle), 1);
        assert_eq!(gather_water(&mut world, &mut chronicle), 1);
        assert_eq!(world.skills.gathering, 52);
        assert_eq!(world.tasks[0].progress, 0);
    }

    #[test]
    fn shelter_is_built_once() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.stock.wood = 25;
        build_shelter(&mut world, &mut chronicle).expect("enough wood");
        assert!(world.shelter.built);
        assert_eq!(world.stock.wood, 15);
        assert_eq!(
            build_shelter(&mut world, &mut chronicle),
            Err(Rejection::ShelterUnavailable)
        );
        assert_eq!(world.stock.wood, 15);
    }

    #[test]
    fn fire_needs_three_wood() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.stock.wood = 2;
        assert_eq!(start_fire(&mut world, &mut chronicle), Err(Rejection::FireUnavailable));
        assert!(!world.shelter.fire_lit);
        world.stock.wood = 3;
        start_fire(&mut world, &mut chronicle).expect("enough wood");
        assert!(world.shelter.fire_lit);
        assert_eq!(world.stock.wood, 0);
    }

    #[test]
    fn buildings_raise_production() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.stock.wood = 18;
        build_farm(&mut world, &mut chronicle).expect("farm");
        build_mine(&mut world, &mut chronicle).expect("mine");
        build_workshop(&mut world, &mut chronicle).expect("workshop");
        assert_eq!(world.stock.wood, 0);
        assert_eq!(world.village.buildings.farm, 1);
        assert_eq!(world.village.buildings.mine, 1);
        assert_eq!(world.village.buildings.workshop, 1);
        assert_eq!(world.village.production.farm, 2);
        assert_eq!(world.village.production.mine, 2);
        assert_eq!(
            build_farm(&mut world, &mut chronicle),
            Err(Rejection::NotEnoughWoodToBuild("farm"))
        );
    }

    #[test]
    fn recruiting_costs_food() {
        let mut world = World::default();
        let mut chronicle = Chronicle::new();
        world.stock.food = 5;
        recruit_villager(&mut world, &mut chronicle).expect("enough food");
        assert_eq!(world.stock.food, 2);
        assert_eq!(world.village.villagers, 1);
        assert_eq!(world.village.production.farm, 1);
        assert_eq!(world.village.production.mine, 1);
        assert_eq!(
            recruit_villager(&mut world, &mut chronicle),
            Err(Rejection::NotEnoughFoodToRecruit)
        );
        assert_eq!(world.stock.food, 2);
        assert_eq!(world.village.villagers, 1);
    }
}
