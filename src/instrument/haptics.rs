use std::time::Duration;

use tracing::debug;

use crate::instrument::probe::ProbeId;

/// Consumed vibration interface. One pulse per call; the device decides
/// how to realize it. Implementations must not block the frame.
pub trait HapticSink {
    fn pulse(&mut self, probe: ProbeId, amplitude: f32, duration: Duration);
}

/// Absent-device implementation: every pulse is silently dropped.
#[derive(Debug, Default)]
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn pulse(&mut self, _probe: ProbeId, _amplitude: f32, _duration: Duration) {}
}

/// Development sink: pulses show up in the log instead of the hand.
#[derive(Debug, Default)]
pub struct LoggingHaptics;

impl HapticSink for LoggingHaptics {
    fn pulse(&mut self, probe: ProbeId, amplitude: f32, duration: Duration) {
        debug!(
            probe = probe.raw(),
            amplitude,
            duration_ms = duration.as_millis() as u64,
            "haptic pulse"
        );
    }
}
