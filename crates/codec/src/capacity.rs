use crate::error::{CodecError, Result};
use fieldkv_chunker::Budget;
use std::fmt;

/// Point-in-time view of how much of the record budget a payload consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityReport {
    pub used_chars: usize,
    pub max_chars: usize,
    pub percent: f64,
}

impl fmt::Display for CapacityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Storage: {}/{} chars ({:.2}% used)",
            self.used_chars, self.max_chars, self.percent
        )
    }
}

/// Reports and enforces consumption of the (M records x L chars) budget
#[derive(Debug, Clone)]
pub struct CapacityTracker {
    budget: Budget,
    reporting: bool,
}

impl CapacityTracker {
    #[must_use]
    pub const fn new(budget: Budget) -> Self {
        Self {
            budget,
            reporting: true,
        }
    }

    /// Disable or enable the informational log line.
    #[must_use]
    pub const fn with_reporting(mut self, enabled: bool) -> Self {
        self.reporting = enabled;
        self
    }

    #[must_use]
    pub const fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Percentage of `M * L` consumed by `consumed_len` characters.
    #[must_use]
    pub fn usage(&self, consumed_len: usize) -> f64 {
        let max = self.budget.total_chars();
        if max == 0 {
            return 0.0;
        }
        (consumed_len as f64 / max as f64) * 100.0
    }

    #[must_use]
    pub fn snapshot(&self, consumed_len: usize) -> CapacityReport {
        CapacityReport {
            used_chars: consumed_len,
            max_chars: self.budget.total_chars(),
            percent: self.usage(consumed_len),
        }
    }

    /// Log current usage unless reporting is disabled.
    pub fn report(&self, consumed_len: usize) -> CapacityReport {
        let report = self.snapshot(consumed_len);
        if self.reporting {
            log::info!("[Info] {report}");
        }
        report
    }

    /// Fail when a payload of `payload_len` chars needs more than M records.
    pub fn ensure_fits(&self, payload_len: usize) -> Result<()> {
        if self.budget.fits(payload_len) {
            return Ok(());
        }
        Err(CodecError::CapacityExceeded {
            payload_len,
            required: self.budget.records_needed(payload_len),
            max_records: self.budget.max_records,
        })
    }
}
