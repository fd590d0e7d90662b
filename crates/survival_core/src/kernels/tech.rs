use crate::chronicle::Chronicle;
use crate::rejection::Rejection;
use crate::world::{Resource, World};

/// Credit research points and announce them.
pub fn earn_research(world: &mut World, chronicle: &mut Chronicle, points: u32) {
    world.credit_research(points);
    chronicle.push(format!("You earned {} research points.", points));
}

/// Push progress onto every queued task tracking `resource`.
pub fn advance_tasks(world: &mut World, resource: Resource, amount: u32) {
    for task in world
        .tasks
        .iter_mut()
        .filter(|task| task.objective == resource)
    {
        task.progress = task.progress.saturating_add(amount);
    }
}

/// Spend research points on a technology. Unlocks never revert.
pub fn unlock_technology(
    world: &mut World,
    chronicle: &mut Chronicle,
    id: &str,
) -> Result<(), Rejection> {
    let available = world.research_points;
    let tech = world
        .technologies
        .get_mut(id)
        .ok_or_else(|| Rejection::UnknownTechnology(id.to_string()))?;
    if tech.unlocked || available < tech.cost {
        return Err(Rejection::TechnologyUnavailable);
    }
    tech.unlocked = true;
    let cost = tech.cost;
    let message = format!("Technology {} unlocked: {}.", id, tech.reward);
    world.research_points -= cost;
    chronicle.push(message);
    Ok(())
}

/// Claim a finished task's reward and drop it from the queue.
pub fn complete_task(
    world: &mut World,
    chronicle: &mut Chronicle,
    index: usize,
) -> Result<(), Rejection> {
    let task = world.tasks.get(index).ok_or(Rejection::UnknownTask(index))?;
    if !task.is_complete() {
        return Err(Rejection::TaskIncomplete);
    }
    let task = world.tasks.remove(index);
    tracing::debug!(description = %task.description, "task completed");
    earn_research(world, chronicle, task.reward);
    chronicle.push("Task completed!");
    Ok(())
}
