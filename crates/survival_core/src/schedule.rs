//! Periodic timers on a virtual clock.
//!
//! The three timers run independently. [`Schedule::advance`] moves the clock
//! forward and reports every firing that fell inside the step in time order,
//! so the caller can hand each one to the engine before the next is admitted.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timer {
    /// Needs decay and the clock advancing one hour.
    Decay,
    /// Weather re-roll.
    Weather,
    /// Random encounter roll.
    EncounterRoll,
}

impl Timer {
    pub const ALL: [Timer; 3] = [Timer::Decay, Timer::Weather, Timer::EncounterRoll];

    fn slot(self) -> usize {
        match self {
            Timer::Decay => 0,
            Timer::Weather => 1,
            Timer::EncounterRoll => 2,
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Timer::Decay => "decay",
            Timer::Weather => "weather",
            Timer::EncounterRoll => "encounter_roll",
        };
        f.write_str(label)
    }
}

/// Timer periods, serialized as whole milliseconds.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Periods {
    #[serde(rename = "decay_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub decay: Duration,
    #[serde(rename = "weather_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub weather: Duration,
    #[serde(rename = "encounter_roll_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub encounter_roll: Duration,
}

impl Periods {
    pub fn get(&self, timer: Timer) -> Duration {
        match timer {
            Timer::Decay => self.decay,
            Timer::Weather => self.weather,
            Timer::EncounterRoll => self.encounter_roll,
        }
    }
}

impl Default for Periods {
    fn default() -> Self {
        Self {
            decay: Duration::from_secs(5),
            weather: Duration::from_secs(60),
            encounter_roll: Duration::from_secs(15),
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    period: Duration,
    next_due: Option<Duration>,
}

/// A single timer firing at a virtual instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    pub at: Duration,
    pub timer: Timer,
}

#[derive(Clone, Debug)]
pub struct Schedule {
    now: Duration,
    slots: [Slot; 3],
}

impl Schedule {
    /// Build a schedule with every timer stopped.
    pub fn new(periods: &Periods) -> Self {
        let slot = |timer| Slot {
            period: periods.get(timer),
            next_due: None,
        };
        Self {
            now: Duration::ZERO,
            slots: Timer::ALL.map(slot),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Start a timer. Its first firing is one period from now. Starting a
    /// running timer leaves its phase alone.
    pub fn start(&mut self, timer: Timer) {
        let now = self.now;
        let slot = &mut self.slots[timer.slot()];
        if slot.next_due.is_none() && !slot.period.is_zero() {
            slot.next_due = Some(now + slot.period);
        }
    }

    /// Stop a timer; no further firings are reported for it.
    pub fn stop(&mut self, timer: Timer) {
        self.slots[timer.slot()].next_due = None;
    }

    pub fn start_all(&mut self) {
        for timer in Timer::ALL {
            self.start(timer);
        }
    }

    pub fn stop_all(&mut self) {
        for timer in Timer::ALL {
            self.stop(timer);
        }
    }

    pub fn is_running(&self, timer: Timer) -> bool {
        self.slots[timer.slot()].next_due.is_some()
    }

    /// Move the clock forward by `elapsed`, returning every firing due up to
    /// and including the new instant. Firings at the same instant come out in
    /// [`Timer::ALL`] order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Firing> {
        let target = self.now + elapsed;
        let mut firings = Vec::new();
        loop {
            let next = Timer::ALL
                .into_iter()
                .filter_map(|timer| {
                    self.slots[timer.slot()]
                        .next_due
                        .map(|due| Firing { at: due, timer })
                })
                .filter(|firing| firing.at <= target)
                .min_by_key(|firing| (firing.at, firing.timer));
            let Some(firing) = next else {
                break;
            };
            let slot = &mut self.slots[firing.timer.slot()];
            slot.next_due = Some(firing.at + slot.period);
            firings.push(firing);
        }
        self.now = target;
        firings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timers(firings: &[Firing]) -> Vec<Timer> {
        firings.iter().map(|firing| firing.timer).collect()
    }

    #[test]
    fn stopped_schedule_never_fires() {
        let mut schedule = Schedule::new(&Periods::default());
        assert!(schedule.advance(Duration::from_secs(600)).is_empty());
        assert_eq!(schedule.now(), Duration::from_secs(600));
    }

    #[test]
    fn default_periods_interleave() {
        let mut schedule = Schedule::new(&Periods::default());
        schedule.start_all();
        let firings = schedule.advance(Duration::from_secs(60));
        let decays = firings.iter().filter(|f| f.timer == Timer::Decay).count();
        let rolls = firings
            .iter()
            .filter(|f| f.timer == Timer::EncounterRoll)
            .count();
        let weather = firings.iter().filter(|f| f.timer == Timer::Weather).count();
        assert_eq!((decays, rolls, weather), (12, 4, 1));
        assert!(firings.windows(2).all(|pair| pair[0].at <= pair[1].at));
        assert_eq!(
            timers(&firings[firings.len() - 3..]),
            vec![Timer::Decay, Timer::Weather, Timer::EncounterRoll]
        );
    }

    #[test]
    fn small_steps_match_one_large_step() {
        let mut stepped = Schedule::new(&Periods::default());
        let mut jumped = stepped.clone();
        stepped.start_all();
        jumped.start_all();
        let mut collected = Vec::new();
        for _ in 0..120 {
            collected.extend(stepped.advance(Duration::from_millis(1_000)));
        }
        assert_eq!(collected, jumped.advance(Duration::from_secs(120)));
    }

    #[test]
    fn stop_and_restart_rephases() {
        let mut schedule = Schedule::new(&Periods::default());
        schedule.start(Timer::Decay);
        assert_eq!(schedule.advance(Duration::from_secs(4)).len(), 0);
        schedule.stop(Timer::Decay);
        assert!(!schedule.is_running(Timer::Decay));
        assert_eq!(schedule.advance(Duration::from_secs(4)).len(), 0);
        schedule.start(Timer::Decay);
        let firings = schedule.advance(Duration::from_secs(5));
        assert_eq!(
            firings,
            vec![Firing {
                at: Duration::from_secs(13),
                timer: Timer::Decay
            }]
        );
    }

    #[test]
    fn periods_round_trip_as_millis() {
        let periods: Periods =
            serde_json::from_str(r#"{"decay_ms": 250}"#).expect("periods parse");
        assert_eq!(periods.decay, Duration::from_millis(250));
        assert_eq!(periods.weather, Duration::from_secs(60));
        let value = serde_json::to_value(&periods).expect("periods serialize");
        assert_eq!(value["encounter_roll_ms"], 15_000);
    }
}
