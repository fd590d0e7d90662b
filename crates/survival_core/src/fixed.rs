/// Upper bound for every player vital (health, hunger, thirst, energy).
pub const VITAL_MAX: u8 = 100;

/// Maximum number of crafted items the player can carry.
pub const INVENTORY_CAPACITY: usize = 20;

/// Number of hours in a day on the world clock.
pub const HOURS_PER_DAY: u8 = 24;

/// Clamp an integer value to the `[0, VITAL_MAX]` vital range.
pub fn clamp_vital(value: i32) -> u8 {
    value.clamp(0, i32::from(VITAL_MAX)) as u8
}

/// Apply a signed delta to a vital meter, returning the clamped value.
pub fn commit_vital_delta(current: u8, delta: i32) -> u8 {
    clamp_vital(i32::from(current) + delta)
}

/// Floor-divided skill bonus shared by gathering yield and attack damage.
pub fn skill_bonus(level: u32) -> u32 {
    level / 10
}
