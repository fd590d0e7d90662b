use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::fixed::HOURS_PER_DAY;
use crate::rng::Stream;
use crate::schedule::Periods;
use crate::world::{Environment, Resource, Stock, Task, Technology, Weather, World};
use crate::Engine;

/// Scenario description used to build the starting world.
///
/// Every field is optional in JSON; missing fields fall back to the standard
/// opening of a fresh game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub name: String,
    /// Numeric RNG seed. Takes precedence over `phrase`.
    pub rng_seed: Option<u64>,
    /// Free-form phrase hashed into an RNG seed.
    pub phrase: Option<String>,
    pub periods: Periods,
    pub start: Start,
    pub technologies: BTreeMap<String, TechnologySeed>,
    pub tasks: Vec<TaskSeed>,
}

/// Starting stocks and clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Start {
    pub wood: u32,
    pub food: u32,
    pub water: u32,
    pub hour: u8,
    pub weather: Weather,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologySeed {
    pub cost: u32,
    pub reward: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSeed {
    pub description: String,
    pub objective: Resource,
    pub goal: u32,
    pub reward: u32,
}

impl Default for Start {
    fn default() -> Self {
        Self {
            wood: 0,
            food: 5,
            water: 5,
            hour: 6,
            weather: Weather::Clear,
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        let technologies = [
            ("stoneAge", 10, "Stone Tools"),
            ("metallurgy", 20, "Metal Tools"),
            ("steelWorking", 30, "Steel Weapons"),
            ("fortifications", 25, "Stronger Walls"),
            ("diplomacy", 15, "Trade Agreements"),
        ]
        .into_iter()
        .map(|(id, cost, reward)| {
            (
                id.to_string(),
                TechnologySeed {
                    cost,
                    reward: reward.to_string(),
                },
            )
        })
        .collect();
        let tasks = vec![
            TaskSeed {
                description: "Gather 10 wood".to_string(),
                objective: Resource::Wood,
                goal: 10,
                reward: 2,
            },
            TaskSeed {
                description: "Gather 5 food".to_string(),
                objective: Resource::Food,
                goal: 5,
                reward: 1,
            },
        ];
        Self {
            name: "default".to_string(),
            rng_seed: None,
            phrase: None,
            periods: Periods::default(),
            start: Start::default(),
            technologies,
            tasks,
        }
    }
}

impl Seed {
    /// Load a seed JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open seed file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize and validate a seed document from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let seed: Seed = serde_json::from_reader(reader).context("invalid seed json")?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.start.hour < HOURS_PER_DAY,
            "seed {} starts at hour {}, expected 0..{}",
            self.name,
            self.start.hour,
            HOURS_PER_DAY
        );
        for (label, period) in [
            ("decay", self.periods.decay),
            ("weather", self.periods.weather),
            ("encounter_roll", self.periods.encounter_roll),
        ] {
            ensure!(!period.is_zero(), "seed {} has a zero {} period", self.name, label);
        }
        let mut seen = HashSet::new();
        for task in &self.tasks {
            ensure!(
                seen.insert(task.description.as_str()),
                "seed {} lists task {:?} twice",
                self.name,
                task.description
            );
            ensure!(
                task.goal > 0,
                "seed {} task {:?} needs a positive goal",
                self.name,
                task.description
            );
        }
        Ok(())
    }

    /// Random stream for this scenario, falling back to entropy.
    pub fn stream(&self, rng_seed_override: Option<u64>) -> Stream {
        match (rng_seed_override.or(self.rng_seed), &self.phrase) {
            (Some(seed), _) => Stream::from_seed(seed),
            (None, Some(phrase)) => Stream::from_phrase(phrase),
            (None, None) => Stream::from_entropy(),
        }
    }
}

/// Realise a [`World`] from the given seed description.
pub fn build_world(seed: &Seed) -> World {
    let start = &seed.start;
    let technologies = seed
        .technologies
        .iter()
        .map(|(id, tech)| {
            (
                id.clone(),
                Technology {
                    unlocked: false,
                    cost: tech.cost,
                    reward: tech.reward.clone(),
                },
            )
        })
        .collect();
    let tasks = seed
        .tasks
        .iter()
        .map(|task| Task {
            description: task.description.clone(),
            objective: task.objective,
            goal: task.goal,
            progress: 0,
            reward: task.reward,
        })
        .collect();
    World::new(
        Environment::new(start.hour, start.weather),
        Stock {
            wood: start.wood,
            food: start.food,
            water: start.water,
        },
        technologies,
        tasks,
    )
}

/// Build a ready-to-play engine for the seed.
pub fn build_engine(seed: &Seed, rng_seed_override: Option<u64>) -> Engine<Stream> {
    Engine::new(build_world(seed), seed.stream(rng_seed_override))
}
