use chrono::{DateTime, Utc};

/// Running minimum of `order timestamp - rollback margin`.
///
/// Starts at the far-future sentinel so the first observed order always
/// lowers it. Observation order does not matter.
#[derive(Debug, Clone)]
pub struct HorizonTracker {
    margin: chrono::Duration,
    horizon: DateTime<Utc>,
    observed: usize,
}

impl HorizonTracker {
    pub fn new(margin: chrono::Duration) -> Self {
        Self {
            margin,
            horizon: DateTime::<Utc>::MAX_UTC,
            observed: 0,
        }
    }

    pub fn observe(&mut self, timestamp: DateTime<Utc>) {
        let candidate = timestamp
            .checked_sub_signed(self.margin)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        if candidate < self.horizon {
            self.horizon = candidate;
        }
        self.observed += 1;
    }

    /// Final horizon, never later than `now`. `None` if nothing was observed.
    pub fn finish(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.observed == 0 {
            return None;
        }
        Some(self.horizon.min(now))
    }
}

/// Rollback horizon for a batch of order timestamps
pub fn rollback_horizon<I>(timestamps: I, margin: chrono::Duration, now: DateTime<Utc>) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut tracker = HorizonTracker::new(margin);
    for timestamp in timestamps {
        tracker.observe(timestamp);
    }
    tracker.finish(now)
}
