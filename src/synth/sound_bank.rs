// Sound bank - fixed click voicings, one per role
//
// Bound once at construction; the sequencing side never deals in pitches
// or durations, only in roles.

use super::click::ClickSynth;
use crate::sequencer::pattern::ClickRole;

/// One pre-bound click: pitch label, note-value duration, velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickSpec {
    pub pitch: &'static str,
    pub duration: &'static str,
    pub velocity: f32,
}

/// Maps a [`ClickRole`] to the click it triggers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundBank {
    accent: ClickSpec,
    normal: ClickSpec,
    subdivision: ClickSpec,
}

impl SoundBank {
    /// The stock voicing: a high accent and two low tom-like clicks,
    /// all short and quiet
    pub fn standard() -> Self {
        Self {
            accent: ClickSpec {
                pitch: "A3",
                duration: "16n",
                velocity: 0.1,
            },
            normal: ClickSpec {
                pitch: "B2",
                duration: "16n",
                velocity: 0.1,
            },
            subdivision: ClickSpec {
                pitch: "C2",
                duration: "16n",
                velocity: 0.1,
            },
        }
    }

    pub fn spec(&self, role: ClickRole) -> ClickSpec {
        match role {
            ClickRole::Accent => self.accent,
            ClickRole::Normal => self.normal,
            ClickRole::Subdivision => self.subdivision,
        }
    }

    /// Fire the click bound to `role` on the given synth
    pub fn trigger(&self, role: ClickRole, synth: &mut ClickSynth) {
        let spec = self.spec(role);
        synth.trigger(spec.pitch, spec.duration, spec.velocity);
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::standard()
    }
}
