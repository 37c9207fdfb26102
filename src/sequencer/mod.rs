// Sequencer - beat pattern, playback clock, and tick timer

pub mod clock;
pub mod metronome;
pub mod pattern;
pub mod timer;
pub mod timing;

pub use clock::{ClockState, PlaybackClock, SharedBeatState, STOPPED_CURSOR, Tick};
pub use metronome::Metronome;
pub use pattern::{ClickRole, Pattern, Slot};
pub use timer::{TickControl, TickTimer};
pub use timing::{MAX_BPM, MIN_BPM, Tempo};
