use crate::chronicle::Chronicle;
use crate::fixed::HOURS_PER_DAY;
use crate::rng::RandomSource;
use crate::world::{Weather, World};

/// Move the clock forward one hour, wrapping at midnight.
pub fn advance_hour(world: &mut World) {
    let next = (world.environment.hour() + 1) % HOURS_PER_DAY;
    world.environment.set_hour(next);
}

/// Draw a fresh weather state uniformly and announce it.
///
/// The draw may repeat the current weather; the change is announced either way.
pub fn reroll_weather<R: RandomSource>(
    world: &mut World,
    rng: &mut R,
    chronicle: &mut Chronicle,
) -> Weather {
    let index = rng.below(Weather::ALL.len() as u32) as usize;
    let weather = Weather::ALL[index];
    world.environment.set_weather(weather);
    chronicle.push(format!("The weather changes to {}.", weather));
    weather
}
