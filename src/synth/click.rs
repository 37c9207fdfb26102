// Click synth - short membrane-style percussive voice
//
// One mono voice: a sine oscillator with a fast downward pitch sweep and
// an exponential amplitude decay. Triggering never fails; a new trigger
// simply replaces any still-decaying voice (clicks are far shorter than a
// tick period, so overlap does not occur in practice).

use std::f32::consts::PI;

/// Fallback when a pitch label fails to parse
const DEFAULT_PITCH_HZ: f32 = 440.0;

/// Fallback when a duration label fails to parse ("16n" at 120 BPM)
const DEFAULT_DURATION_SECS: f32 = 0.125;

/// Note-value durations are resolved at a fixed reference tempo
const REFERENCE_BPM: f32 = 120.0;

/// How many times the starting frequency sits above the base pitch
const PITCH_SWEEP_RATIO: f32 = 3.0;

/// Time constant of the pitch sweep in seconds
const PITCH_DECAY_SECS: f32 = 0.008;

/// Parse a scientific pitch label ("A3", "C#2", "Eb4") to a frequency
pub fn parse_pitch(label: &str) -> Option<f32> {
    let mut chars = label.chars();

    let semitone_from_c = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest: String = chars.collect();
    let (accidental, octave_str) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest.as_str()),
    };

    let octave: i32 = octave_str.parse().ok()?;

    // MIDI note number, A4 (69) = 440 Hz
    let midi = (octave + 1) * 12 + semitone_from_c + accidental;
    Some(440.0 * 2.0_f32.powf((midi - 69) as f32 / 12.0))
}

/// Parse a note-value duration label ("4n" = quarter, "16n" = sixteenth)
/// to seconds at the reference tempo
pub fn parse_note_duration(label: &str) -> Option<f32> {
    let denominator: f32 = label.strip_suffix('n')?.parse().ok()?;
    if denominator < 1.0 {
        return None;
    }

    let beat_seconds = 60.0 / REFERENCE_BPM;
    Some(beat_seconds * 4.0 / denominator)
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    base_freq: f32,
    velocity: f32,
    phase: f32,
    position: usize,
    length: usize,
}

/// Mono percussive click generator, rendered sample-by-sample in the
/// audio callback
#[derive(Debug, Clone)]
pub struct ClickSynth {
    sample_rate: f32,
    voice: Option<Voice>,
}

impl ClickSynth {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            voice: None,
        }
    }

    /// Start a click at the given pitch, duration, and velocity.
    /// Unparseable labels fall back to defaults; velocity is clamped to
    /// [0, 1]. No return value, no failure reporting.
    pub fn trigger(&mut self, pitch: &str, duration: &str, velocity: f32) {
        let base_freq = parse_pitch(pitch).unwrap_or(DEFAULT_PITCH_HZ);
        let seconds = parse_note_duration(duration).unwrap_or(DEFAULT_DURATION_SECS);
        let length = ((seconds * self.sample_rate) as usize).max(1);

        self.voice = Some(Voice {
            base_freq,
            velocity: velocity.clamp(0.0, 1.0),
            phase: 0.0,
            position: 0,
            length,
        });
    }

    /// Render one sample (0.0 when no voice is active)
    pub fn process_sample(&mut self) -> f32 {
        let Some(ref mut voice) = self.voice else {
            return 0.0;
        };

        if voice.position >= voice.length {
            self.voice = None;
            return 0.0;
        }

        // Downward pitch sweep: starts PITCH_SWEEP_RATIO above the base
        // frequency and settles onto it within a few milliseconds
        let elapsed = voice.position as f32 / self.sample_rate;
        let sweep = PITCH_SWEEP_RATIO * (-elapsed / PITCH_DECAY_SECS).exp();
        let freq = voice.base_freq * (1.0 + sweep);

        // Exponential amplitude decay over the voice duration
        let t = voice.position as f32 / voice.length as f32;
        let envelope = (-t * 6.0).exp();

        let sample = voice.phase.sin() * envelope * voice.velocity;

        voice.phase += 2.0 * PI * freq / self.sample_rate;
        if voice.phase > 2.0 * PI {
            voice.phase -= 2.0 * PI;
        }
        voice.position += 1;

        sample
    }

    /// Render a whole buffer of click output
    pub fn process_buffer(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.process_sample();
        }
    }

    pub fn is_active(&self) -> bool {
        self.voice.is_some()
    }

    pub fn reset(&mut self) {
        self.voice = None;
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
