//! Per-operation latency and error counters
//!
//! [`OperationMetrics`] is shared by clone; every clone records into the same
//! table. The lock is held only to update or copy a handful of counters.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

/// Calls slower than this are logged at `warn`.
const SLOW_OPERATION: Duration = Duration::from_secs(5);

/// Counters for a single operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationStats {
    pub calls: u64,
    pub errors: u64,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
    pub last_called: DateTime<Utc>,
}

impl OperationStats {
    fn first(elapsed: Duration, success: bool) -> Self {
        Self {
            calls: 1,
            errors: u64::from(!success),
            total: elapsed,
            min: elapsed,
            max: elapsed,
            last_called: Utc::now(),
        }
    }

    fn record(&mut self, elapsed: Duration, success: bool) {
        self.calls += 1;
        if !success {
            self.errors += 1;
        }
        self.total = self.total.saturating_add(elapsed);
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
        self.last_called = Utc::now();
    }

    pub fn average(&self) -> Duration {
        u32::try_from(self.calls).map_or(Duration::ZERO, |calls| {
            if calls == 0 {
                Duration::ZERO
            } else {
                self.total / calls
            }
        })
    }

    /// Share of calls that succeeded, as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = (self.calls - self.errors) as f64 / self.calls as f64 * 100.0;
        rate
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationMetrics {
    table: Arc<Mutex<BTreeMap<String, OperationStats>>>,
}

impl OperationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, BTreeMap<String, OperationStats>> {
        // Counters stay consistent even if a holder panicked mid-update.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, operation: &str, elapsed: Duration, success: bool) {
        if elapsed > SLOW_OPERATION {
            let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            warn!(operation, duration_ms, "slow_operation");
        }
        let mut table = self.table();
        match table.get_mut(operation) {
            Some(stats) => stats.record(elapsed, success),
            None => {
                table.insert(operation.to_string(), OperationStats::first(elapsed, success));
            }
        }
    }

    /// Copy of the counters, ordered by operation name.
    pub fn snapshot(&self) -> BTreeMap<String, OperationStats> {
        self.table().clone()
    }

    pub fn get(&self, operation: &str) -> Option<OperationStats> {
        self.table().get(operation).copied()
    }

    pub fn reset(&self) {
        self.table().clear();
    }
}
