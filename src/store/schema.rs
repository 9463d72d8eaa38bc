use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Progress through the lesson currently being played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingState {
    pub key: String,
    pub name: String,
    pub path: PathBuf,
    pub total: usize,
    /// Index of the question on screen; `curr == total` means the lesson is done.
    pub curr: usize,
    pub correct: u32,
    pub incorrect: u32,
}

impl PlayingState {
    pub fn is_complete(&self) -> bool {
        self.curr >= self.total
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub viewed: BTreeSet<String>,
    pub completed: BTreeSet<String>,
    pub score: u64,
    pub correct: u64,
    pub incorrect: u64,
    pub accuracy: f64,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
}

impl Default for SessionMeta {
    fn default() -> Self {
        Self {
            viewed: BTreeSet::new(),
            completed: BTreeSet::new(),
            score: 0,
            correct: 0,
            incorrect: 0,
            accuracy: 0.0,
            last_played: None,
        }
    }
}

impl SessionMeta {
    pub fn record_answer(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
            self.score += 1;
        } else {
            self.incorrect += 1;
        }
        let answered = self.correct + self.incorrect;
        self.accuracy = self.correct as f64 / answered as f64;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionBlob {
    pub schema_version: u32,
    pub playing: Option<PlayingState>,
    pub meta: SessionMeta,
}

impl Default for SessionBlob {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            playing: None,
            meta: SessionMeta::default(),
        }
    }
}

impl SessionBlob {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
