use std::time::Duration;

use serde::Serialize;

use crate::action::Action;
use crate::rejection::Rejection;
use crate::rng::RandomSource;
use crate::schedule::{Firing, Timer};
use crate::{Engine, Snapshot};

/// One NDJSON line: what happened at a virtual instant and the state after it.
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    pub t_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timers: Vec<Timer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
    pub state: Snapshot<'a>,
}

pub fn make_frame<'a, R: RandomSource>(
    at: Duration,
    firings: &[Firing],
    action: Option<(&'a Action, &Result<(), Rejection>)>,
    engine: &'a Engine<R>,
) -> Frame<'a> {
    let (action, rejected) = match action {
        Some((action, outcome)) => (
            Some(action),
            outcome.as_ref().err().map(|rejection| rejection.to_string()),
        ),
        None => (None, None),
    };
    Frame {
        t_ms: at.as_millis() as u64,
        timers: firings.iter().map(|firing| firing.timer).collect(),
        action,
        rejected,
        state: engine.snapshot(),
    }
}

impl Frame<'_> {
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}
