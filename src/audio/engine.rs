// Audio engine - realtime CPAL callback
//
// The device's preferred sample format (F32, I16, or U16) is detected via
// `sample_format()` and the matching stream type is built through the
// generic `build_stream`. All rendering happens in f32; conversion to the
// device format goes through CPAL's `FromSample` at the moment samples are
// written into the output buffer, without allocation.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::audio::parameters::AtomicF32;
use crate::messaging::channels::{CommandConsumer, NotificationProducer};
use crate::messaging::command::Command;
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::synth::click::ClickSynth;
use crate::synth::sound_bank::SoundBank;

#[derive(Debug, Error)]
pub enum AudioEngineError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format: {0:?} (supported: F32, I16, U16)")]
    UnsupportedFormat(SampleFormat),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    sample_rate: f32,
    pub volume: AtomicF32,
}

impl AudioEngine {
    pub fn new(
        command_rx: CommandConsumer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Self, AudioEngineError> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(AudioEngineError::NoDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        // Master volume, shared between the UI slider and the callback
        let volume = AtomicF32::new(0.5);
        let volume_clone = volume.clone();

        let synth = ClickSynth::new(sample_rate);
        let bank = SoundBank::standard();

        let notification_tx_err = notification_tx.clone();

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                command_rx,
                synth,
                bank,
                volume_clone,
                notification_tx_err,
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                command_rx,
                synth,
                bank,
                volume_clone,
                notification_tx_err,
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                command_rx,
                synth,
                bank,
                volume_clone,
                notification_tx_err,
            ),
            other => return Err(AudioEngineError::UnsupportedFormat(other)),
        }?;

        stream.play()?;

        if let Ok(mut tx) = notification_tx.try_lock() {
            let notif = Notification::info(
                NotificationCategory::Audio,
                format!("Audio connected: {} Hz", sample_rate),
            );
            let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
        }

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            volume,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Build an audio stream with automatic format conversion
    #[allow(clippy::too_many_arguments)]
    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        mut command_rx: CommandConsumer,
        mut synth: ClickSynth,
        bank: SoundBank,
        volume: AtomicF32,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Stream, AudioEngineError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations, no I/O, no blocking locks in here

                while let Some(cmd) = ringbuf::traits::Consumer::try_pop(&mut command_rx) {
                    match cmd {
                        Command::Trigger(role) => bank.trigger(role, &mut synth),
                        Command::SetVolume(vol) => volume.set(vol.clamp(0.0, 1.0)),
                        Command::Quit => {}
                    }
                }

                let current_volume = volume.get();
                for frame in data.chunks_mut(channels) {
                    let sample = (synth.process_sample() * current_volume).clamp(-1.0, 1.0);

                    // mono click -> every channel of the frame
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = T::from_sample(sample);
                    }
                }
            },
            move |err| {
                // Runs outside the audio callback, I/O is fine here
                eprintln!("Audio stream error: {}", err);

                if let Ok(mut tx) = notification_tx.try_lock() {
                    let notif = Notification::error(
                        NotificationCategory::Audio,
                        format!("Audio stream error: {}", err),
                    );
                    let _ = ringbuf::traits::Producer::try_push(&mut *tx, notif);
                }
            },
            None,
        )?;

        Ok(stream)
    }
}
