use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use tracing::{debug, warn};

/// WAV capture thread: mirrors rendered hops to disk. Fed by a channel
/// so the synth worker never blocks on file I/O; finalizes when the
/// sender side is dropped.
pub struct WavCapture;

impl WavCapture {
    pub fn run(rx: Receiver<Vec<f32>>, path: String, sample_rate: u32) -> JoinHandle<()> {
        std::thread::Builder::new()
            .name("wav".into())
            .spawn(move || {
                let spec = hound::WavSpec {
                    channels: 1,
                    sample_rate,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                let mut writer = match hound::WavWriter::create(&path, spec) {
                    Ok(w) => w,
                    Err(err) => {
                        warn!(%err, path = %path, "could not open wav output");
                        // Drain so senders never block on a dead writer.
                        while rx.recv().is_ok() {}
                        return;
                    }
                };
                while let Ok(chunk) = rx.recv() {
                    for sample in chunk {
                        if let Err(err) = writer.write_sample(sample) {
                            warn!(%err, path = %path, "wav write failed, stopping capture");
                            while rx.recv().is_ok() {}
                            return;
                        }
                    }
                }
                if let Err(err) = writer.finalize() {
                    warn!(%err, path = %path, "wav finalize failed");
                } else {
                    debug!(path = %path, "wav capture finalized");
                }
            })
            .expect("spawn wav thread")
    }
}
