pub mod crafting;
pub mod economy;
pub mod encounter;
pub mod environment;
pub mod tech;
pub mod vitals;
