//! Download progress computation (pure).
//!
//! With an advertised total, progress is `floor(received / total × 100)`. Without
//! one it follows `95 × (1 − e^(−received / scale))`, which rises quickly at first and
//! flattens out below 95. Either way the reported value never decreases, and
//! [`ProgressTracker::finish`] yields 100 exactly once.

/// Ceiling for unknown-length downloads before completion.
pub const HEURISTIC_CAP: u8 = 95;

/// Tracks bytes received and the percentage last reported.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: Option<u64>,
    scale: f64,
    received: u64,
    percent: u8,
    finished: bool,
}

impl ProgressTracker {
    /// `total` is the advertised size (`None` or zero means unknown); `scale` is the
    /// byte count at which the heuristic curve reaches ~63% of its cap.
    pub fn new(total: Option<u64>, scale: u64) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            scale: scale.max(1) as f64,
            received: 0,
            percent: 0,
            finished: false,
        }
    }

    /// Bytes received so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Last percentage reported.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Advertised total, if any.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Count `bytes` more. Returns the new percentage if it changed.
    pub fn advance(&mut self, bytes: usize) -> Option<u8> {
        if self.finished {
            return None;
        }
        self.received = self.received.saturating_add(bytes as u64);
        let computed = match self.total {
            Some(total) => exact_percent(self.received, total),
            None => heuristic_percent(self.received, self.scale),
        };
        self.raise_to(computed)
    }

    /// Mark completion. Returns `Some(100)` the first time 100 is reached, `None` if
    /// 100 was already reported.
    pub fn finish(&mut self) -> Option<u8> {
        self.finished = true;
        self.raise_to(100)
    }

    /// Whether an advertised total was not reached.
    pub fn is_short(&self) -> bool {
        self.total.is_some_and(|total| self.received < total)
    }

    fn raise_to(&mut self, computed: u8) -> Option<u8> {
        if computed > self.percent {
            self.percent = computed;
            Some(computed)
        } else {
            None
        }
    }
}

fn exact_percent(received: u64, total: u64) -> u8 {
    let pct = (u128::from(received) * 100) / u128::from(total);
    pct.min(100) as u8
}

fn heuristic_percent(received: u64, scale: f64) -> u8 {
    let fraction = 1.0 - (-(received as f64) / scale).exp();
    let pct = (f64::from(HEURISTIC_CAP) * fraction).floor();
    (pct as u8).min(HEURISTIC_CAP)
}
