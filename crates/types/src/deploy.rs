//! Counters collected over one deploy run.

use serde::Serialize;

/// Per-run deployment counters. Reset at the start of each batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeployStats {
    pub created: usize,
    pub updated: usize,
    pub activated: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl DeployStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
