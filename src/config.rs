use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::instrument::chime::RowLayout;
use crate::instrument::session::SessionParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_latency_ms")]
    pub latency_ms: f32,
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "AudioConfig::default_hop_size")]
    pub hop_size: usize,
    #[serde(default = "AudioConfig::default_master_gain")]
    pub master_gain: f32,
}

impl AudioConfig {
    fn default_latency_ms() -> f32 {
        50.0
    }
    fn default_sample_rate() -> u32 {
        48_000
    }
    fn default_hop_size() -> usize {
        256
    }
    fn default_master_gain() -> f32 {
        0.4
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency_ms(),
            sample_rate: Self::default_sample_rate(),
            hop_size: Self::default_hop_size(),
            master_gain: Self::default_master_gain(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    #[serde(default = "InstrumentConfig::default_chime_count")]
    pub chime_count: usize,
    #[serde(default = "InstrumentConfig::default_probe_radius")]
    pub probe_radius: f32,
    #[serde(default = "InstrumentConfig::default_base_freq_hz")]
    pub base_freq_hz: f32,
    #[serde(default = "InstrumentConfig::default_haptic_pulse_ms")]
    pub haptic_pulse_ms: u64,
}

impl InstrumentConfig {
    fn default_chime_count() -> usize {
        10
    }
    fn default_probe_radius() -> f32 {
        0.03
    }
    fn default_base_freq_hz() -> f32 {
        110.0
    }
    fn default_haptic_pulse_ms() -> u64 {
        100
    }

    #[must_use]
    pub fn layout(&self) -> RowLayout {
        RowLayout {
            count: self.chime_count,
            ..RowLayout::default()
        }
    }
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            chime_count: Self::default_chime_count(),
            probe_radius: Self::default_probe_radius(),
            base_freq_hz: Self::default_base_freq_hz(),
            haptic_pulse_ms: Self::default_haptic_pulse_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Frames between pose beacons; 0 disables the beacon.
    #[serde(default = "NetworkConfig::default_beacon_interval_frames")]
    pub beacon_interval_frames: u64,
    #[serde(default = "NetworkConfig::default_name")]
    pub name: String,
    #[serde(default)]
    pub peers: Vec<String>,
}

impl NetworkConfig {
    fn default_beacon_interval_frames() -> u64 {
        60
    }
    fn default_name() -> String {
        "player".to_string()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            beacon_interval_frames: Self::default_beacon_interval_frames(),
            name: Self::default_name(),
            peers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub instrument: InstrumentConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl AppConfig {
    /// Read the config, falling back to defaults on parse or read
    /// trouble. A missing file is written out with the defaults so the
    /// knobs are discoverable.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => warn!(%err, path, "failed to parse config, using defaults"),
                },
                Err(err) => warn!(%err, path, "failed to read config, using defaults"),
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    warn!(%err, path, "failed to write default config");
                }
            }
            Err(err) => warn!(%err, "failed to serialize default config"),
        }
        default_cfg
    }

    #[must_use]
    pub fn session_params(&self) -> SessionParams {
        SessionParams {
            probe_radius: self.instrument.probe_radius,
            base_freq_hz: self.instrument.base_freq_hz,
            haptic_pulse: Duration::from_millis(self.instrument.haptic_pulse_ms),
            beacon_interval: self.network.beacon_interval_frames,
            name: self.network.name.clone(),
        }
    }
}
