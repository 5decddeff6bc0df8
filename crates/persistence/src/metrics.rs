//! Store metrics collection.

use metrics::histogram;
use std::time::Instant;

/// Record how long a store operation took.
pub fn record_operation_duration(operation: &'static str, duration_secs: f64) {
    histogram!(
        "store_operation_duration_seconds",
        "operation" => operation
    )
    .record(duration_secs);
}

/// Times a store operation and records it on [`StoreTimer::record`].
///
/// ```ignore
/// let timer = StoreTimer::new("list_residents");
/// let rows = tables.residents.list();
/// timer.record();
/// ```
pub struct StoreTimer {
    operation: &'static str,
    start: Instant,
}

impl StoreTimer {
    /// Start timing `operation`.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        record_operation_duration(self.operation, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_timer_creation() {
        let timer = StoreTimer::new("get_resident");
        assert_eq!(timer.operation, "get_resident");
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        StoreTimer::new("ping").record();
    }
}
