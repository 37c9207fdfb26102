// Metronome controller - the single long-lived state owner
//
// Bridges the UI to the playback clock and the audio thread: start/stop
// spawn and cancel the tick timer, parameter setters forward to the clock,
// and every fired slot is pushed to the audio engine as a trigger command.

use super::clock::{PlaybackClock, SharedBeatState, Tick};
use super::pattern::Pattern;
use super::timer::{TickControl, TickTimer};
use crate::messaging::channels::CommandProducer;
use crate::messaging::command::Command;
use std::sync::{Arc, Mutex};

pub struct Metronome {
    clock: Arc<Mutex<PlaybackClock>>,
    shared: Arc<SharedBeatState>,
    timer: Option<TickTimer>,
    command_tx: Arc<Mutex<CommandProducer>>,
}

impl Metronome {
    pub fn new(command_tx: CommandProducer) -> Self {
        let shared = SharedBeatState::new();
        let clock = Arc::new(Mutex::new(PlaybackClock::new(Arc::clone(&shared))));

        Self {
            clock,
            shared,
            timer: None,
            command_tx: Arc::new(Mutex::new(command_tx)),
        }
    }

    /// Start (or restart) playback. An already-live timer is cancelled
    /// first, so exactly one timer exists at any moment.
    pub fn start(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }

        let period = match self.clock.lock() {
            Ok(mut clock) => clock.arm(),
            Err(_) => return,
        };

        let clock = Arc::clone(&self.clock);
        let command_tx = Arc::clone(&self.command_tx);

        self.timer = Some(TickTimer::spawn(period, move || {
            let tick = match clock.lock() {
                Ok(mut clock) => clock.tick(),
                Err(_) => return TickControl::Stop,
            };

            match tick {
                Tick::Idle => TickControl::Stop,
                Tick::Fired { role, rearm, .. } => {
                    // Cursor is already published; now fire the sound
                    if let Ok(mut tx) = command_tx.lock() {
                        let _ =
                            ringbuf::traits::Producer::try_push(&mut *tx, Command::Trigger(role));
                    }

                    match rearm {
                        Some(new_period) => TickControl::Rearm(new_period),
                        None => TickControl::Continue,
                    }
                }
            }
        }));
    }

    /// Stop playback and clear the highlight. A no-op when already stopped.
    pub fn stop(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
        if let Ok(mut clock) = self.clock.lock() {
            clock.disarm();
        }
    }

    pub fn set_tempo(&self, bpm: u32) {
        if let Ok(mut clock) = self.clock.lock() {
            clock.set_tempo(bpm);
        }
    }

    pub fn set_beat_multiplier(&self, multiplier: u32) {
        if let Ok(mut clock) = self.clock.lock() {
            clock.set_beat_multiplier(multiplier);
        }
    }

    pub fn set_beats(&self, beats: u32) {
        if let Ok(mut clock) = self.clock.lock() {
            clock.set_beats(beats);
        }
    }

    pub fn tempo_bpm(&self) -> u32 {
        self.clock.lock().map(|c| c.tempo().bpm()).unwrap_or(0)
    }

    pub fn beat_multiplier(&self) -> u32 {
        self.clock.lock().map(|c| c.multiplier()).unwrap_or(0)
    }

    pub fn beats(&self) -> u32 {
        self.clock.lock().map(|c| c.beats()).unwrap_or(0)
    }

    /// Snapshot of the current pattern for rendering the indicator row
    pub fn pattern(&self) -> Pattern {
        match self.clock.lock() {
            Ok(clock) => clock.pattern().clone(),
            Err(_) => Pattern::standard(1, 1),
        }
    }

    /// Shared playback state for per-frame polling
    pub fn shared_state(&self) -> Arc<SharedBeatState> {
        Arc::clone(&self.shared)
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }
}

impl Drop for Metronome {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::create_command_channel;
    use crate::sequencer::clock::STOPPED_CURSOR;
    use crate::sequencer::pattern::ClickRole;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_start_ticks_and_sends_triggers() {
        let (tx, mut rx) = create_command_channel(64);
        let mut metronome = Metronome::new(tx);
        let shared = metronome.shared_state();

        // 400 BPM x 4 subdivisions = 37.5 ms per tick
        metronome.set_tempo(400);
        metronome.start();
        assert!(metronome.is_running());

        thread::sleep(Duration::from_millis(200));
        metronome.stop();

        assert!(!metronome.is_running());
        assert_eq!(shared.current_slot(), STOPPED_CURSOR);

        // The first fired slot must be the downbeat accent
        let mut triggers = Vec::new();
        while let Some(cmd) = ringbuf::traits::Consumer::try_pop(&mut rx) {
            if let Command::Trigger(role) = cmd {
                triggers.push(role);
            }
        }
        assert!(!triggers.is_empty());
        assert_eq!(triggers[0], ClickRole::Accent);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (tx, _rx) = create_command_channel(64);
        let mut metronome = Metronome::new(tx);

        metronome.stop();
        metronome.stop();
        assert!(!metronome.is_running());
    }

    #[test]
    fn test_restart_keeps_single_timer() {
        let (tx, mut rx) = create_command_channel(256);
        let mut metronome = Metronome::new(tx);
        metronome.set_tempo(400);

        // Restarting repeatedly must not stack timers: the tick rate
        // afterwards stays in the range a single timer produces
        for _ in 0..5 {
            metronome.start();
        }

        thread::sleep(Duration::from_millis(200));
        metronome.stop();

        let mut count = 0;
        while ringbuf::traits::Consumer::try_pop(&mut rx).is_some() {
            count += 1;
        }
        // One 37.5 ms timer yields ~5 ticks in 200 ms (restart resets the
        // first tick's delay); five stacked timers would yield ~25
        assert!(count >= 2, "too few ticks: {count}");
        assert!(count <= 12, "timers stacked: {count}");
    }

    #[test]
    fn test_setters_forward_to_clock() {
        let (tx, _rx) = create_command_channel(64);
        let metronome = Metronome::new(tx);

        metronome.set_tempo(60);
        assert_eq!(metronome.tempo_bpm(), 60);

        metronome.set_beat_multiplier(3);
        assert_eq!(metronome.beat_multiplier(), 3);
        assert_eq!(metronome.pattern().len(), 12);

        metronome.set_beat_multiplier(0);
        assert_eq!(metronome.beat_multiplier(), 3);

        metronome.set_beats(2);
        assert_eq!(metronome.beats(), 2);
        assert_eq!(metronome.pattern().len(), 6);
    }
}
