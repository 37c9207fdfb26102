// Metronaut - library exports for tests and benchmarks

pub mod audio;
pub mod messaging;
pub mod sequencer;
pub mod synth;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::engine::{AudioEngine, AudioEngineError};
pub use audio::parameters::AtomicF32;
pub use messaging::channels::{create_command_channel, create_notification_channel};
pub use messaging::command::Command;
pub use sequencer::{
    ClickRole, ClockState, Metronome, Pattern, PlaybackClock, SharedBeatState, Slot, Tempo, Tick,
    TickControl, TickTimer,
};
pub use synth::click::ClickSynth;
pub use synth::sound_bank::{ClickSpec, SoundBank};
