// Tempo representation and tick-period arithmetic

use std::fmt;
use std::time::Duration;

/// Lowest accepted tempo in BPM
pub const MIN_BPM: u32 = 20;

/// Highest accepted tempo in BPM
pub const MAX_BPM: u32 = 400;

/// Tempo in BPM (Beats Per Minute)
///
/// Out-of-range values are clamped on construction, so a tempo can never
/// produce a zero or non-finite tick period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    /// Creates a new tempo, clamped to `[MIN_BPM, MAX_BPM]`
    pub fn new(bpm: u32) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
        }
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Duration of one subdivision tick: 60000 / (bpm * multiplier) ms
    ///
    /// `multiplier` is the number of subdivision ticks per beat and must
    /// be >= 1 (guarded upstream).
    pub fn tick_period(&self, multiplier: u32) -> Duration {
        Duration::from_secs_f64(60.0 / (self.bpm as f64 * multiplier.max(1) as f64))
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(40)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}
