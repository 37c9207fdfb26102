// Repeating tick timer backed by a dedicated thread
//
// Stands in for a host run-loop's registerRepeating/cancel pair. The
// callback decides on every tick whether the timer keeps its period,
// re-arms with a new one (applied from the next tick boundary), or stops.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the tick callback wants the timer to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Keep ticking at the current period
    Continue,
    /// Cancel the current cadence and re-register with a new period
    Rearm(Duration),
    /// Stop ticking; the timer thread exits
    Stop,
}

/// Handle to one live repeating timer
///
/// At most one handle per metronome is live at any time; the controller
/// cancels the old one before spawning a replacement. Cancellation is
/// deterministic: `cancel` wakes the sleeping thread and joins it, so no
/// tick can fire after it returns. Dropping the handle cancels too.
#[derive(Debug)]
pub struct TickTimer {
    cancel_tx: mpsc::Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Register `on_tick` to fire repeatedly, first after one `period`
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> TickControl + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        let thread = thread::spawn(move || {
            let mut period = period;
            loop {
                match cancel_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => match on_tick() {
                        TickControl::Continue => {}
                        TickControl::Rearm(new_period) => period = new_period,
                        TickControl::Stop => break,
                    },
                    // Cancelled, or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            cancel_tx,
            thread: Some(thread),
        }
    }

    /// Cancel the timer and wait for its thread to exit
    pub fn cancel(&mut self) {
        let _ = self.cancel_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
