// Audio - CPAL backend and realtime callback

pub mod engine;
pub mod parameters;

pub use engine::{AudioEngine, AudioEngineError};
pub use parameters::AtomicF32;
