use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock duration of one measurement stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Ordered stage timings of one call, returned to the caller instead of being
/// accumulated in shared state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Run `f`, record its duration under `label` and return its value.
    pub fn time<R>(&mut self, label: &str, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let out = f();
        self.push(label, elapsed_ms(start));
        out
    }

    /// Sum of all entries with the given label.
    pub fn stage_ms(&self, label: &str) -> f64 {
        self.stages
            .iter()
            .filter(|s| s.label == label)
            .map(|s| s.elapsed_ms)
            .sum()
    }

    /// Add `other`'s stages into this breakdown, summing entries that share a
    /// label. Totals are added as well.
    pub fn accumulate(&mut self, other: &TimingBreakdown) {
        self.total_ms += other.total_ms;
        for stage in &other.stages {
            match self.stages.iter_mut().find(|s| s.label == stage.label) {
                Some(existing) => existing.elapsed_ms += stage.elapsed_ms,
                None => self.stages.push(stage.clone()),
            }
        }
    }
}

#[inline]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_merges_by_label() {
        let mut a = TimingBreakdown::with_total(3.0);
        a.push("contour", 1.0);
        a.push("refine", 2.0);
        let mut b = TimingBreakdown::with_total(5.0);
        b.push("refine", 4.0);
        b.push("height", 1.0);
        a.accumulate(&b);
        assert_eq!(a.total_ms, 8.0);
        assert_eq!(a.stage_ms("refine"), 6.0);
        assert_eq!(a.stage_ms("height"), 1.0);
        assert_eq!(a.stages.len(), 3);
    }

    #[test]
    fn time_returns_closure_value() {
        let mut t = TimingBreakdown::default();
        let v = t.time("work", || 21 * 2);
        assert_eq!(v, 42);
        assert_eq!(t.stages.len(), 1);
        assert!(t.stages[0].elapsed_ms >= 0.0);
    }
}
