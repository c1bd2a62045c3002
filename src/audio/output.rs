/// Audio output device handling
///
/// Owns the cpal stream and the process-wide claim on the output
/// device: at most one `AudioOutput` exists at a time, and dropping it
/// releases the claim. Start failures are the desktop analog of a
/// blocked autoplay: the caller logs them and leaves playback state
/// untouched, and the user retries with another press.
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::player::PlayerCore;

static OUTPUT_CLAIMED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("another playback output is already active")]
    AlreadyActive,
    #[error("could not query the output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("could not open the audio stream: {0}")]
    Stream(#[from] cpal::BuildStreamError),
    #[error("could not start the audio stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Exclusively-owned handle to the running output stream
pub struct AudioOutput {
    // Dropping the stream stops playback
    _stream: cpal::Stream,
    sample_rate: u32,
}

impl AudioOutput {
    /// Claim the output device and start streaming samples pulled from
    /// the shared controller core.
    pub fn start(core: Arc<Mutex<PlayerCore>>) -> Result<Self, OutputError> {
        if OUTPUT_CLAIMED.swap(true, Ordering::SeqCst) {
            return Err(OutputError::AlreadyActive);
        }

        let result = Self::open(core);
        if result.is_err() {
            OUTPUT_CLAIMED.store(false, Ordering::SeqCst);
        }
        result
    }

    fn open(core: Arc<Mutex<PlayerCore>>) -> Result<Self, OutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(OutputError::NoDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        if let Ok(mut core) = core.lock() {
            core.set_sample_rate(sample_rate);
        }

        let mut mono: Vec<f32> = Vec::new();
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels.max(1);
                if mono.len() < frames {
                    mono.resize(frames, 0.0);
                }

                match core.lock() {
                    Ok(mut core) => core.mix_into(&mut mono[..frames]),
                    Err(_) => mono[..frames].fill(0.0),
                }

                // Duplicate the mono signal across the device channels
                for (frame, sample) in data.chunks_mut(channels.max(1)).zip(&mono) {
                    frame.fill(*sample);
                }
            },
            |err| tracing::warn!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;
        tracing::info!(sample_rate, channels, "audio output started");

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        OUTPUT_CLAIMED.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for AudioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioOutput")
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}
