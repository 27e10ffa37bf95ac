use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: u64, text: String) -> Self {
        Self {
            id,
            text,
            completed: false,
        }
    }
}

/// Hands out millisecond timestamps as ids, bumped past the last one issued so
/// two adds inside the same clock tick still get distinct ids.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Seeds the generator so it never reissues an id already present in `tasks`.
    pub fn after(tasks: &[Task]) -> Self {
        Self {
            last: tasks.iter().map(|t| t.id).max().unwrap_or(0),
        }
    }

    /// Once the counter has reached `u64::MAX` there is nothing above it left
    /// to hand out, so the smallest id not used by `taken` is returned instead.
    pub fn next_id(&mut self, taken: &[Task]) -> u64 {
        let Some(floor) = self.last.checked_add(1) else {
            return smallest_unused(taken);
        };
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(floor);
        self.last
    }
}

fn smallest_unused(taken: &[Task]) -> u64 {
    let used: HashSet<u64> = taken.iter().map(|t| t.id).collect();
    (0..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0)
}
