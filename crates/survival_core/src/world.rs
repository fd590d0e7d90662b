use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::fixed::{HOURS_PER_DAY, INVENTORY_CAPACITY, VITAL_MAX};
use crate::kernels::crafting::Recipe;

/// Player vitals, each held within `[0, VITAL_MAX]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: u8,
    pub hunger: u8,
    pub thirst: u8,
    pub energy: u8,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: VITAL_MAX,
            hunger: VITAL_MAX,
            thirst: VITAL_MAX,
            energy: VITAL_MAX,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Storm,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Storm];

    /// Daytime temperature in whole degrees Celsius.
    pub fn base_temperature(self) -> i32 {
        match self {
            Weather::Clear => 25,
            Weather::Rain => 20,
            Weather::Storm => 15,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Weather::Clear => "Clear",
            Weather::Rain => "Rain",
            Weather::Storm => "Storm",
        };
        f.write_str(label)
    }
}

/// Clock and weather. Temperature is derived and only changes alongside the
/// hour or the weather.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    hour: u8,
    weather: Weather,
    temperature: i32,
}

impl Environment {
    pub fn new(hour: u8, weather: Weather) -> Self {
        let hour = hour % HOURS_PER_DAY;
        Self {
            hour,
            weather,
            temperature: derive_temperature(hour, weather),
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn is_day(&self) -> bool {
        is_daytime(self.hour)
    }

    pub(crate) fn set_hour(&mut self, hour: u8) {
        self.hour = hour % HOURS_PER_DAY;
        self.temperature = derive_temperature(self.hour, self.weather);
    }

    pub(crate) fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
        self.temperature = derive_temperature(self.hour, self.weather);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(6, Weather::Clear)
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Environment", 4)?;
        state.serialize_field("hour", &self.hour)?;
        state.serialize_field("weather", &self.weather)?;
        state.serialize_field("temperature", &self.temperature)?;
        state.serialize_field("daytime", &self.is_day())?;
        state.end()
    }
}

fn is_daytime(hour: u8) -> bool {
    (6..18).contains(&hour)
}

fn derive_temperature(hour: u8, weather: Weather) -> i32 {
    let night_drop = if is_daytime(hour) { 0 } else { 10 };
    weather.base_temperature() - night_drop
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Wood,
    Food,
    Water,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resource::Wood => "wood",
            Resource::Food => "food",
            Resource::Water => "water",
        };
        f.write_str(label)
    }
}

/// Raw material stocks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub wood: u32,
    pub food: u32,
    pub water: u32,
}

impl Stock {
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Wood => self.wood,
            Resource::Food => self.food,
            Resource::Water => self.water,
        }
    }

    pub(crate) fn slot_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Wood => &mut self.wood,
            Resource::Food => &mut self.food,
            Resource::Water => &mut self.water,
        }
    }

    pub(crate) fn credit(&mut self, resource: Resource, amount: u32) {
        let slot = self.slot_mut(resource);
        *slot = slot.saturating_add(amount);
    }

    /// Debit `amount` if fully covered. Never spends partially.
    pub(crate) fn try_spend(&mut self, resource: Resource, amount: u32) -> bool {
        let slot = self.slot_mut(resource);
        match slot.checked_sub(amount) {
            Some(rest) => {
                *slot = rest;
                true
            }
            None => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    pub built: bool,
    pub fire_lit: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buildings {
    pub farm: u32,
    pub mine: u32,
    pub workshop: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub farm: u32,
    pub mine: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
    pub villagers: u32,
    pub buildings: Buildings,
    pub production: Production,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Gathering,
    Crafting,
    Combat,
    Exploration,
}

/// Monotonic skill counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub gathering: u32,
    pub crafting: u32,
    pub combat: u32,
    pub exploration: u32,
}

impl Skills {
    pub fn level(&self, skill: Skill) -> u32 {
        match skill {
            Skill::Gathering => self.gathering,
            Skill::Crafting => self.crafting,
            Skill::Combat => self.combat,
            Skill::Exploration => self.exploration,
        }
    }

    pub(crate) fn train(&mut self, skill: Skill, amount: u32) {
        let slot = match skill {
            Skill::Gathering => &mut self.gathering,
            Skill::Crafting => &mut self.crafting,
            Skill::Combat => &mut self.combat,
            Skill::Exploration => &mut self.exploration,
        };
        *slot = slot.saturating_add(amount);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub unlocked: bool,
    pub cost: u32,
    pub reward: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub objective: Resource,
    pub goal: u32,
    pub progress: u32,
    pub reward: u32,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.goal
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Raider,
    WildAnimal,
}

impl EnemyKind {
    pub fn starting_health(self) -> u32 {
        match self {
            EnemyKind::Raider => 50,
            EnemyKind::WildAnimal => 30,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnemyKind::Raider => "raider",
            EnemyKind::WildAnimal => "wild animal",
        };
        f.write_str(label)
    }
}

/// The single live encounter. Absence is modelled as `Option::None` on
/// [`World::encounter`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Encounter {
    Hostile { kind: EnemyKind, enemy_health: u32 },
    Trader,
}

impl Encounter {
    pub fn hostile(kind: EnemyKind) -> Self {
        Encounter::Hostile {
            kind,
            enemy_health: kind.starting_health(),
        }
    }
}

/// Complete simulation state. Every tick handler and action borrows it
/// mutably for the duration of one call.
#[derive(Clone, Debug, Serialize)]
pub struct World {
    pub vitals: Vitals,
    pub environment: Environment,
    pub stock: Stock,
    pub shelter: Shelter,
    pub village: Village,
    pub inventory: Vec<Recipe>,
    pub inventory_capacity: usize,
    pub skills: Skills,
    pub technologies: BTreeMap<String, Technology>,
    pub tasks: Vec<Task>,
    pub research_points: u32,
    pub encounter: Option<Encounter>,
}

impl World {
    pub fn new(
        environment: Environment,
        stock: Stock,
        technologies: BTreeMap<String, Technology>,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            vitals: Vitals::default(),
            environment,
            stock,
            shelter: Shelter::default(),
            village: Village::default(),
            inventory: Vec::new(),
            inventory_capacity: INVENTORY_CAPACITY,
            skills: Skills::default(),
            technologies,
            tasks,
            research_points: 0,
            encounter: None,
        }
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= self.inventory_capacity
    }

    pub(crate) fn credit_research(&mut self, points: u32) {
        self.research_points = self.research_points.saturating_add(points);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(
            Environment::default(),
            Stock::default(),
            BTreeMap::new(),
            Vec::new(),
        )
    }
}
