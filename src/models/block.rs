use chrono::{DateTime, TimeDelta, Utc};

use crate::utils::BLOCK_DURATION_HOURS;

/// The current fixed-length usage block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMetrics {
    pub start_time: DateTime<Utc>,
}

impl BlockMetrics {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self { start_time }
    }

    /// Elapsed time within the block, clamped to `[0, block duration]`
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        (now - self.start_time).clamp(TimeDelta::zero(), TimeDelta::hours(BLOCK_DURATION_HOURS))
    }
}
