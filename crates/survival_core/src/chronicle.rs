use std::collections::VecDeque;

use serde::Serialize;

/// Number of messages the chronicle keeps.
pub const CHRONICLE_LEN: usize = 10;

pub const OPENING_LINE: &str = "You wake up in an unknown land...";

/// Newest-first feed of human readable messages.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Chronicle {
    entries: VecDeque<String>,
}

impl Chronicle {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(CHRONICLE_LEN),
        }
    }

    /// Chronicle seeded with the opening line of a fresh game.
    pub fn opening() -> Self {
        let mut chronicle = Self::new();
        chronicle.entries.push_front(OPENING_LINE.to_string());
        chronicle
    }

    pub fn push<M: Into<String>>(&mut self, message: M) {
        let message = message.into();
        tracing::info!(target: "chronicle", "{}", message);
        self.entries.push_front(message);
        self.entries.truncate(CHRONICLE_LEN);
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for Chronicle {
    fn default() -> Self {
        Self::new()
    }
}
