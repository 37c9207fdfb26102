// Synth - click voice generation and the role-to-sound binding

pub mod click;
pub mod sound_bank;

pub use click::ClickSynth;
pub use sound_bank::{ClickSpec, SoundBank};
