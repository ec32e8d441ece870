//! Manual refresh counter
//!
//! Part of every fetch key: bumping it forces exactly one re-fetch of each
//! active slot even when nothing else changed.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RefreshCounter(u64);

impl RefreshCounter {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn bump(&mut self) -> u64 {
        self.0 = self.0.saturating_add(1);
        self.0
    }
}
