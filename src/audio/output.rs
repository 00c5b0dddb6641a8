//! Audio output sinks
//!
//! A sink consumes one decoded buffer and reports completion over a channel,
//! so the playback controller can race a hard stop against natural end
//! without double-firing completion logic. The cpal sink drives the default
//! output device; [`NullSink`] completes instantly for headless use and
//! tests.

use crate::audio::pcm::AudioData;
use crate::Result;
use crossbeam_channel::{bounded, Receiver};

/// One-shot audio output. Not `Send`: a sink is created and driven entirely
/// on the pipeline worker thread.
pub trait AudioSink {
    /// Output sample rate the buffer must be converted to before `start`
    fn sample_rate(&self) -> u32;

    /// Begin playing `audio`, replacing anything currently playing.
    /// The returned channel delivers exactly one message when the buffer
    /// has drained naturally.
    fn start(&mut self, audio: AudioData) -> Result<Receiver<()>>;

    /// Halt playback and discard buffered audio; safe when idle.
    fn stop(&mut self);
}

/// Sink that discards audio and completes immediately
#[derive(Debug, Default)]
pub struct NullSink {
    sample_rate: u32,
}

impl NullSink {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl AudioSink for NullSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start(&mut self, _audio: AudioData) -> Result<Receiver<()>> {
        let (tx, rx) = bounded(1);
        let _ = tx.send(());
        Ok(rx)
    }

    fn stop(&mut self) {}
}

#[cfg(feature = "audio-io")]
pub use cpal_sink::CpalSink;

#[cfg(feature = "audio-io")]
mod cpal_sink {
    use super::AudioSink;
    use crate::audio::pcm::AudioData;
    use crate::{Error, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Device, Stream, StreamConfig};
    use crossbeam_channel::{bounded, Receiver, Sender};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing::{error, info};

    /// Sink over the platform's default output device
    pub struct CpalSink {
        device: Device,
        config: StreamConfig,
        stream: Option<Stream>,
    }

    impl CpalSink {
        pub fn new() -> Result<Self> {
            let host = cpal::default_host();

            let device = host
                .default_output_device()
                .ok_or_else(|| Error::AudioDevice("No output device available".into()))?;

            info!(
                "Using output device: {}",
                device.name().unwrap_or_else(|_| "Unknown".to_string())
            );

            let config = device
                .default_output_config()
                .map_err(|e| Error::AudioDevice(format!("Failed to get output config: {}", e)))?
                .into();

            Ok(Self {
                device,
                config,
                stream: None,
            })
        }
    }

    impl AudioSink for CpalSink {
        fn sample_rate(&self) -> u32 {
            self.config.sample_rate.0
        }

        fn start(&mut self, audio: AudioData) -> Result<Receiver<()>> {
            self.stop();

            let (done_tx, done_rx) = bounded(1);
            let channels = self.config.channels as usize;
            let buffer = Arc::new(Mutex::new(audio.samples));
            // Taken on the callback side exactly once, when the buffer drains
            let done: Arc<Mutex<Option<Sender<()>>>> = Arc::new(Mutex::new(Some(done_tx)));

            let err_fn = |err| {
                error!("Audio output stream error: {}", err);
            };

            let stream = self
                .device
                .build_output_stream(
                    &self.config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        let mut buf = buffer.lock();
                        let frames = data.len() / channels;
                        let available = buf.len().min(frames);

                        for (i, sample) in buf.iter().take(available).enumerate() {
                            for c in 0..channels {
                                data[i * channels + c] = *sample;
                            }
                        }
                        buf.drain(0..available);

                        for value in data[available * channels..].iter_mut() {
                            *value = 0.0;
                        }

                        if buf.is_empty() {
                            if let Some(tx) = done.lock().take() {
                                let _ = tx.send(());
                            }
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| Error::AudioDevice(format!("Failed to build output stream: {}", e)))?;

            stream
                .play()
                .map_err(|e| Error::AudioDevice(format!("Failed to start output stream: {}", e)))?;

            self.stream = Some(stream);
            Ok(done_rx)
        }

        fn stop(&mut self) {
            if let Some(stream) = self.stream.take() {
                drop(stream);
            }
        }
    }

    impl Drop for CpalSink {
        fn drop(&mut self) {
            self.stop();
        }
    }
}
