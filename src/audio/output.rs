use std::fmt;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};

#[derive(Debug)]
pub enum OutputError {
    NoDevice,
    NoConfig(cpal::DefaultStreamConfigError),
    Build(cpal::BuildStreamError),
    Play(cpal::PlayStreamError),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::NoDevice => write!(f, "no default output device"),
            OutputError::NoConfig(e) => write!(f, "no default output config: {e}"),
            OutputError::Build(e) => write!(f, "failed to build output stream: {e}"),
            OutputError::Play(e) => write!(f, "failed to start output stream: {e}"),
        }
    }
}

impl std::error::Error for OutputError {}

/// Realtime output: a cpal stream fed from a ring buffer. The synth
/// worker pushes mono samples; the callback fans each one out to every
/// device channel and substitutes silence on underrun.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    pub sample_rate: u32,
}

impl AudioOutput {
    pub fn start(latency_ms: f32) -> Result<(Self, HeapProd<f32>), OutputError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(OutputError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(OutputError::NoConfig)?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let latency_frames = (sample_rate as f32 * latency_ms / 1000.0).max(1.0) as usize;
        let rb = HeapRb::<f32>::new(latency_frames * 4);
        let (prod, mut cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let n_frames = data.len() / channels as usize;
                    for frame in 0..n_frames {
                        let s = cons.try_pop().unwrap_or(0.0);
                        for ch in 0..channels as usize {
                            data[frame * channels as usize + ch] = s;
                        }
                    }
                },
                |err| tracing::warn!(%err, "output stream error"),
                None,
            )
            .map_err(OutputError::Build)?;
        stream.play().map_err(OutputError::Play)?;

        Ok((
            Self {
                stream: Some(stream),
                sample_rate,
            },
            prod,
        ))
    }

    /// Blocking push from the synth worker; backs off briefly while the
    /// ring is full so the worker paces itself to the device clock.
    pub fn push_samples(prod: &mut HeapProd<f32>, samples: &[f32]) {
        let mut offset = 0;
        while offset < samples.len() {
            offset += prod.push_slice(&samples[offset..]);
            if offset < samples.len() {
                std::thread::sleep(std::time::Duration::from_micros(200));
            }
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stream.take();
    }
}
