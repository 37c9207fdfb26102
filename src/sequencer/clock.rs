// Playback clock - advances the cursor through the pattern on each tick
//
// The clock is a two-state machine: Stopped, or Running with the tempo and
// multiplier that were in effect when the timer was armed. Parameter
// changes land in the live fields immediately but only take effect on the
// tick that first observes the drift, which then reports the new period so
// the driving timer can cancel and re-arm. The period of a live timer is
// never mutated in place.

use super::pattern::{ClickRole, Pattern};
use super::timing::Tempo;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Cursor value meaning "stopped, no slot highlighted"
pub const STOPPED_CURSOR: i64 = -1;

/// Playback state shared with the UI thread
///
/// Thread-safe via atomics so the UI can poll the current slot every frame
/// without taking the clock lock.
#[derive(Debug)]
pub struct SharedBeatState {
    current_slot: AtomicI64,
    pattern_len: AtomicU64,
    running: AtomicBool,
}

impl SharedBeatState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            current_slot: AtomicI64::new(STOPPED_CURSOR),
            pattern_len: AtomicU64::new(0),
            running: AtomicBool::new(false),
        })
    }

    /// Current slot index, or `STOPPED_CURSOR` when nothing is highlighted
    pub fn current_slot(&self) -> i64 {
        self.current_slot.load(Ordering::Relaxed)
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern_len.load(Ordering::Relaxed) as usize
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn set_current_slot(&self, slot: i64) {
        self.current_slot.store(slot, Ordering::Relaxed);
    }

    fn set_pattern_len(&self, len: usize) {
        self.pattern_len.store(len as u64, Ordering::Relaxed);
    }

    fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }
}

/// Clock state: stopped, or running with the armed parameter snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running {
        armed_tempo: Tempo,
        armed_multiplier: u32,
    },
}

/// Outcome of one timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Clock is stopped; the caller should cancel its timer
    Idle,
    /// A slot fired. `rearm` carries the new tick period when the live
    /// tempo or multiplier drifted from the armed values.
    Fired {
        slot: usize,
        role: ClickRole,
        rearm: Option<Duration>,
    },
}

/// The metronome's sequencing core
///
/// Owns the pattern, the cursor, and the live tempo/multiplier. Cursor
/// updates are published to [`SharedBeatState`] before the fired role is
/// handed back, so observers always see the new position no later than the
/// audible trigger.
#[derive(Debug)]
pub struct PlaybackClock {
    pattern: Pattern,
    cursor: i64,
    tempo: Tempo,
    beats: u32,
    multiplier: u32,
    state: ClockState,
    shared: Arc<SharedBeatState>,
}

impl PlaybackClock {
    pub const DEFAULT_BEATS: u32 = 4;
    pub const DEFAULT_MULTIPLIER: u32 = 4;

    pub fn new(shared: Arc<SharedBeatState>) -> Self {
        let beats = Self::DEFAULT_BEATS;
        let multiplier = Self::DEFAULT_MULTIPLIER;
        let pattern = Pattern::standard(beats, multiplier);

        shared.set_pattern_len(pattern.len());
        shared.set_current_slot(STOPPED_CURSOR);
        shared.set_running(false);

        Self {
            pattern,
            cursor: STOPPED_CURSOR,
            tempo: Tempo::default(),
            beats,
            multiplier,
            state: ClockState::Stopped,
            shared,
        }
    }

    /// Capture the live tempo and multiplier as the armed snapshot and
    /// transition to Running. Arming while already Running re-arms cleanly.
    /// Returns the tick period for the timer to register with.
    pub fn arm(&mut self) -> Duration {
        self.state = ClockState::Running {
            armed_tempo: self.tempo,
            armed_multiplier: self.multiplier,
        };
        self.shared.set_running(true);
        self.tempo.tick_period(self.multiplier)
    }

    /// Transition to Stopped and reset the cursor to the stopped sentinel.
    /// Disarming while already Stopped is a no-op.
    pub fn disarm(&mut self) {
        self.state = ClockState::Stopped;
        self.cursor = STOPPED_CURSOR;
        self.shared.set_current_slot(STOPPED_CURSOR);
        self.shared.set_running(false);
    }

    /// One timer tick: advance the cursor (wrapping at pattern length),
    /// publish the new position, then report the slot's role and whether
    /// the timer must re-arm because tempo or multiplier changed.
    pub fn tick(&mut self) -> Tick {
        let ClockState::Running {
            armed_tempo,
            armed_multiplier,
        } = self.state
        else {
            return Tick::Idle;
        };

        if self.pattern.is_empty() {
            return Tick::Idle;
        }

        let mut next = self.cursor + 1;
        if next >= self.pattern.len() as i64 {
            next = 0;
        }
        self.cursor = next;
        self.shared.set_current_slot(next);

        let slot = next as usize;
        let Some(fired) = self.pattern.slot(slot) else {
            return Tick::Idle;
        };

        // Lazy restart: a tempo or multiplier change is picked up on the
        // first tick that observes it, at most one tick period late.
        let rearm = if armed_tempo != self.tempo || armed_multiplier != self.multiplier {
            Some(self.arm())
        } else {
            None
        };

        Tick::Fired {
            slot,
            role: fired.role,
            rearm,
        }
    }

    /// Store a new tempo (clamped). The running timer picks it up on its
    /// next tick; nothing restarts eagerly.
    pub fn set_tempo(&mut self, bpm: u32) {
        self.tempo = Tempo::new(bpm);
    }

    /// Change the subdivision multiplier. Values < 1 are rejected without
    /// touching any state. Valid changes rebuild the pattern; the cursor
    /// resets to the stopped sentinel so the next tick plays slot 0 of the
    /// new pattern rather than landing on a stale index.
    pub fn set_beat_multiplier(&mut self, multiplier: u32) {
        if multiplier < 1 {
            return;
        }
        self.multiplier = multiplier;
        self.rebuild_pattern();
    }

    /// Change the number of beats per cycle. Values < 1 are rejected.
    pub fn set_beats(&mut self, beats: u32) {
        if beats < 1 {
            return;
        }
        self.beats = beats;
        self.rebuild_pattern();
    }

    fn rebuild_pattern(&mut self) {
        self.pattern = Pattern::standard(self.beats, self.multiplier);
        self.cursor = STOPPED_CURSOR;
        self.shared.set_pattern_len(self.pattern.len());
        self.shared.set_current_slot(STOPPED_CURSOR);
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn beats(&self) -> u32 {
        self.beats
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_clock() -> (PlaybackClock, Arc<SharedBeatState>) {
        let shared = SharedBeatState::new();
        let mut clock = PlaybackClock::new(Arc::clone(&shared));
        clock.arm();
        (clock, shared)
    }

    fn fired_slot(tick: Tick) -> usize {
        match tick {
            Tick::Fired { slot, .. } => slot,
            Tick::Idle => panic!("expected a fired tick"),
        }
    }

    #[test]
    fn test_defaults() {
        let shared = SharedBeatState::new();
        let clock = PlaybackClock::new(Arc::clone(&shared));

        assert_eq!(clock.tempo().bpm(), 40);
        assert_eq!(clock.beats(), 4);
        assert_eq!(clock.multiplier(), 4);
        assert_eq!(clock.pattern().len(), 16);
        assert!(!clock.is_running());
        assert_eq!(shared.current_slot(), STOPPED_CURSOR);
        assert_eq!(shared.pattern_len(), 16);
    }

    #[test]
    fn test_tick_while_stopped_is_idle() {
        let shared = SharedBeatState::new();
        let mut clock = PlaybackClock::new(shared);

        assert_eq!(clock.tick(), Tick::Idle);
        assert_eq!(clock.tick(), Tick::Idle);
    }

    #[test]
    fn test_arm_returns_period() {
        let (mut clock, _) = running_clock();
        // Re-arm is idempotent and keeps returning the current period
        assert_eq!(clock.arm(), Duration::from_millis(375));
    }

    #[test]
    fn test_cursor_cycles_and_wraps() {
        let (mut clock, shared) = running_clock();

        // Two full cycles through the 16-slot pattern
        for round in 0..2 {
            for expected in 0..16 {
                let slot = fired_slot(clock.tick());
                assert_eq!(slot, expected, "round {round}");
                assert_eq!(shared.current_slot(), expected as i64);
            }
        }
    }

    #[test]
    fn test_fired_roles_follow_pattern() {
        let (mut clock, _) = running_clock();

        let mut roles = Vec::new();
        for _ in 0..16 {
            match clock.tick() {
                Tick::Fired { role, .. } => roles.push(role),
                Tick::Idle => panic!("expected a fired tick"),
            }
        }

        assert_eq!(roles[0], ClickRole::Accent);
        for group_start in [4, 8, 12] {
            assert_eq!(roles[group_start], ClickRole::Normal);
        }
        let filler_count = roles
            .iter()
            .filter(|r| **r == ClickRole::Subdivision)
            .count();
        assert_eq!(filler_count, 12);
    }

    #[test]
    fn test_disarm_resets_cursor() {
        let (mut clock, shared) = running_clock();

        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(shared.current_slot(), 4);

        clock.disarm();
        assert_eq!(shared.current_slot(), STOPPED_CURSOR);
        assert!(!shared.is_running());
        assert_eq!(clock.tick(), Tick::Idle);

        // Disarming again is a no-op
        clock.disarm();
        assert_eq!(clock.tick(), Tick::Idle);
    }

    #[test]
    fn test_tempo_change_rearms_on_next_tick() {
        let (mut clock, _) = running_clock();

        // Advance a few ticks at the armed tempo
        for _ in 0..3 {
            match clock.tick() {
                Tick::Fired { rearm, .. } => assert_eq!(rearm, None),
                Tick::Idle => panic!("expected a fired tick"),
            }
        }

        // 40 -> 60 BPM: next tick reports the new 250 ms period and the
        // cursor keeps advancing from where it was
        clock.set_tempo(60);
        match clock.tick() {
            Tick::Fired { slot, rearm, .. } => {
                assert_eq!(slot, 3);
                assert_eq!(rearm, Some(Duration::from_millis(250)));
            }
            Tick::Idle => panic!("expected a fired tick"),
        }

        // Drift resolved; following ticks run at the new armed values
        match clock.tick() {
            Tick::Fired { slot, rearm, .. } => {
                assert_eq!(slot, 4);
                assert_eq!(rearm, None);
            }
            Tick::Idle => panic!("expected a fired tick"),
        }
    }

    #[test]
    fn test_multiplier_change_rebuilds_and_rearms() {
        let (mut clock, shared) = running_clock();

        for _ in 0..10 {
            clock.tick();
        }

        clock.set_beat_multiplier(2);
        assert_eq!(clock.pattern().len(), 8);
        assert_eq!(shared.pattern_len(), 8);
        // Cursor was reset, so the next tick starts the new pattern over
        match clock.tick() {
            Tick::Fired { slot, role, rearm } => {
                assert_eq!(slot, 0);
                assert_eq!(role, ClickRole::Accent);
                assert_eq!(rearm, Some(Duration::from_millis(750)));
            }
            Tick::Idle => panic!("expected a fired tick"),
        }
    }

    #[test]
    fn test_invalid_multiplier_is_rejected() {
        let (mut clock, shared) = running_clock();
        for _ in 0..3 {
            clock.tick();
        }

        clock.set_beat_multiplier(0);
        assert_eq!(clock.multiplier(), 4);
        assert_eq!(clock.pattern().len(), 16);
        assert_eq!(shared.current_slot(), 2);

        // And no rearm is triggered
        match clock.tick() {
            Tick::Fired { slot, rearm, .. } => {
                assert_eq!(slot, 3);
                assert_eq!(rearm, None);
            }
            Tick::Idle => panic!("expected a fired tick"),
        }
    }

    #[test]
    fn test_invalid_beats_is_rejected() {
        let (mut clock, _) = running_clock();
        clock.set_beats(0);
        assert_eq!(clock.beats(), 4);
        assert_eq!(clock.pattern().len(), 16);
    }

    #[test]
    fn test_beats_change_rebuilds_without_rearm() {
        let (mut clock, shared) = running_clock();
        clock.set_beats(3);
        assert_eq!(clock.pattern().len(), 12);
        assert_eq!(shared.pattern_len(), 12);

        // Beat count is not part of the armed snapshot: the period only
        // depends on tempo and multiplier, so no restart is needed
        match clock.tick() {
            Tick::Fired { slot, rearm, .. } => {
                assert_eq!(slot, 0);
                assert_eq!(rearm, None);
            }
            Tick::Idle => panic!("expected a fired tick"),
        }
    }

    #[test]
    fn test_tempo_is_clamped() {
        let (mut clock, _) = running_clock();
        clock.set_tempo(0);
        assert_eq!(clock.tempo().bpm(), 20);
        clock.set_tempo(9999);
        assert_eq!(clock.tempo().bpm(), 400);
    }
}
