use tracing::{debug, info, warn};

use crate::audio::bank::{SilentBank, ToneBank};
use crate::audio::engine::AudioEngine;
use crate::config::AudioConfig;

/// Owns the optional audio engine behind a single-activation lifecycle.
///
/// Construction is cheap and silent. `activate` is the user-action gate:
/// the first call builds the engine, any later call is a no-op. Until
/// activation succeeds, `bank()` hands out the silent backend, so the
/// tone path degrades to a no-op instead of failing the frame.
#[derive(Default)]
pub struct AudioSystem {
    engine: Option<AudioEngine>,
    silent: SilentBank,
    activated: bool,
}

impl AudioSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: one engine per system, ever. A device failure is
    /// logged and leaves the system running silent.
    pub fn activate(&mut self, cfg: &AudioConfig, play: bool, wav: Option<&str>) {
        if self.activated {
            debug!("audio already activated, ignoring");
            return;
        }
        self.activated = true;
        match AudioEngine::start(cfg, play, wav) {
            Ok(engine) => {
                info!(sample_rate = engine.sample_rate(), play, "audio engine started");
                self.engine = Some(engine);
            }
            Err(err) => warn!(%err, "audio unavailable, running silent"),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    pub fn bank(&mut self) -> &mut dyn ToneBank {
        match self.engine.as_mut() {
            Some(engine) => engine.bank_mut(),
            None => &mut self.silent,
        }
    }
}
