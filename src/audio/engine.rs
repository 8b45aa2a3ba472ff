use std::f32::consts::TAU;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, bounded};
use ringbuf::HeapProd;
use tracing::{debug, trace};

use crate::audio::bank::{ToneBank, ToneHandle};
use crate::audio::output::{AudioOutput, OutputError};
use crate::audio::writer::WavCapture;
use crate::config::AudioConfig;

/// Generator slots available per engine; two controllers plus headroom.
pub const MAX_TONES: usize = 8;

/// Gain ramp length on connect/disconnect, keeps routing clickless.
const RAMP_SEC: f32 = 0.005;

#[derive(Clone, Copy, Debug)]
enum ToneCommand {
    Claim { slot: usize },
    Free { slot: usize },
    SetFrequency { slot: usize, hz: f32 },
    Route { slot: usize, on: bool },
}

/// Frame-side half of the engine: implements `ToneBank` by mirroring
/// slot ownership locally and try-sending commands to the synth worker.
/// A full channel drops the command; the next frame repairs frequency
/// state and routing edges are rare enough not to matter.
pub struct EngineBank {
    tx: Option<Sender<ToneCommand>>,
    claimed: [bool; MAX_TONES],
}

impl EngineBank {
    fn new(tx: Sender<ToneCommand>) -> Self {
        Self {
            tx: Some(tx),
            claimed: [false; MAX_TONES],
        }
    }

    fn send(&self, cmd: ToneCommand) {
        if let Some(tx) = &self.tx
            && tx.try_send(cmd).is_err()
        {
            trace!(?cmd, "tone command dropped");
        }
    }

    fn close(&mut self) {
        self.tx.take();
    }
}

impl ToneBank for EngineBank {
    fn ready(&self) -> bool {
        self.tx.is_some()
    }

    fn allocate(&mut self) -> Option<ToneHandle> {
        let slot = self.claimed.iter().position(|c| !c)?;
        self.claimed[slot] = true;
        self.send(ToneCommand::Claim { slot });
        Some(ToneHandle::from_index(slot))
    }

    fn release(&mut self, handle: ToneHandle) {
        let slot = handle.index();
        if slot < MAX_TONES && self.claimed[slot] {
            self.claimed[slot] = false;
            self.send(ToneCommand::Free { slot });
        }
    }

    fn set_frequency(&mut self, handle: ToneHandle, hz: f32) {
        if hz.is_finite() && hz > 0.0 {
            self.send(ToneCommand::SetFrequency {
                slot: handle.index(),
                hz,
            });
        }
    }

    fn connect(&mut self, handle: ToneHandle) {
        self.send(ToneCommand::Route {
            slot: handle.index(),
            on: true,
        });
    }

    fn disconnect(&mut self, handle: ToneHandle) {
        self.send(ToneCommand::Route {
            slot: handle.index(),
            on: false,
        });
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Osc {
    claimed: bool,
    freq_hz: f32,
    phase: f32,
    gain: f32,
    target: f32,
}

fn step_toward(current: f32, target: f32, step: f32) -> f32 {
    if (target - current).abs() <= step {
        target
    } else if target > current {
        current + step
    } else {
        current - step
    }
}

/// Render one hop of mixed mono samples. Claimed oscillators run
/// continuously; routing only moves their gain target.
fn render_hop(oscs: &mut [Osc], sample_rate: f32, master_gain: f32, out: &mut Vec<f32>, hop: usize) {
    out.clear();
    let dt = 1.0 / sample_rate;
    let ramp = 1.0 / (RAMP_SEC * sample_rate).max(1.0);
    for _ in 0..hop {
        let mut s = 0.0;
        for osc in oscs.iter_mut() {
            if !osc.claimed {
                continue;
            }
            osc.phase = (osc.phase + TAU * osc.freq_hz * dt) % TAU;
            osc.gain = step_toward(osc.gain, osc.target, ramp);
            if osc.gain > 0.0 {
                s += osc.phase.sin() * osc.gain;
            }
        }
        out.push(s * master_gain);
    }
}

fn apply(oscs: &mut [Osc], cmd: ToneCommand) {
    match cmd {
        ToneCommand::Claim { slot } => {
            if let Some(osc) = oscs.get_mut(slot) {
                *osc = Osc {
                    claimed: true,
                    freq_hz: 440.0,
                    ..Osc::default()
                };
            }
        }
        ToneCommand::Free { slot } => {
            if let Some(osc) = oscs.get_mut(slot) {
                osc.claimed = false;
                osc.target = 0.0;
            }
        }
        ToneCommand::SetFrequency { slot, hz } => {
            if let Some(osc) = oscs.get_mut(slot) {
                osc.freq_hz = hz;
            }
        }
        ToneCommand::Route { slot, on } => {
            if let Some(osc) = oscs.get_mut(slot) {
                osc.target = if on { 1.0 } else { 0.0 };
            }
        }
    }
}

enum SynthSink {
    /// Paced by the device clock through the ring buffer.
    Realtime(HeapProd<f32>),
    /// No device; paced by wall-clock deadlines (wav-only runs).
    Timed,
}

fn run_synth(
    rx: Receiver<ToneCommand>,
    mut sink: SynthSink,
    sample_rate: u32,
    hop: usize,
    master_gain: f32,
    wav_tx: Option<Sender<Vec<f32>>>,
) {
    let fs = sample_rate as f32;
    let mut oscs = [Osc::default(); MAX_TONES];
    let mut buf = Vec::with_capacity(hop);
    let hop_duration = Duration::from_secs_f32(hop as f32 / fs);
    let mut next_deadline = Instant::now();

    loop {
        loop {
            match rx.try_recv() {
                Ok(cmd) => apply(&mut oscs, cmd),
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    debug!("command channel closed, synth worker exiting");
                    return;
                }
            }
        }

        render_hop(&mut oscs, fs, master_gain, &mut buf, hop);

        if let Some(tx) = &wav_tx {
            let _ = tx.try_send(buf.clone());
        }

        match &mut sink {
            SynthSink::Realtime(prod) => AudioOutput::push_samples(prod, &buf),
            SynthSink::Timed => {
                next_deadline += hop_duration;
                let now = Instant::now();
                if next_deadline > now {
                    std::thread::sleep(next_deadline - now);
                }
            }
        }
    }
}

/// A running audio backend: cpal output (when playing), the synth worker
/// thread, and the frame-side bank. Dropping the engine closes the
/// command channel, which unwinds the worker and the wav capture.
pub struct AudioEngine {
    bank: EngineBank,
    worker: Option<JoinHandle<()>>,
    wav_worker: Option<JoinHandle<()>>,
    _output: Option<AudioOutput>,
    sample_rate: u32,
}

impl AudioEngine {
    pub fn start(cfg: &AudioConfig, play: bool, wav: Option<&str>) -> Result<Self, OutputError> {
        let (tx, rx) = bounded::<ToneCommand>(256);

        let (output, sink, sample_rate) = if play {
            let (output, prod) = AudioOutput::start(cfg.latency_ms)?;
            let rate = output.sample_rate;
            (Some(output), SynthSink::Realtime(prod), rate)
        } else {
            (None, SynthSink::Timed, cfg.sample_rate)
        };

        let (wav_tx, wav_worker) = match wav {
            Some(path) => {
                let (wtx, wrx) = bounded::<Vec<f32>>(16);
                let handle = WavCapture::run(wrx, path.to_string(), sample_rate);
                (Some(wtx), Some(handle))
            }
            None => (None, None),
        };

        let hop = cfg.hop_size.max(1);
        let master_gain = cfg.master_gain;
        let worker = std::thread::Builder::new()
            .name("synth".into())
            .spawn(move || run_synth(rx, sink, sample_rate, hop, master_gain, wav_tx))
            .expect("spawn synth thread");

        Ok(Self {
            bank: EngineBank::new(tx),
            worker: Some(worker),
            wav_worker,
            _output: output,
            sample_rate,
        })
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bank_mut(&mut self) -> &mut EngineBank {
        &mut self.bank
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.bank.close();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.wav_worker.take() {
            let _ = handle.join();
        }
    }
}
