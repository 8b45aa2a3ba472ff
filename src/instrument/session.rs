use std::time::Duration;

use tracing::debug;

use crate::audio::bank::ToneBank;
use crate::instrument::chime::{ChimeRow, RowLayout};
use crate::instrument::collision::sweep_probe;
use crate::instrument::haptics::HapticSink;
use crate::instrument::probe::{Hand, Probe, ProbeId, ProbeSpec};
use crate::instrument::scale::rank_frequency_hz;
use crate::net::beacon::Beacon;
use crate::net::packet::PosePacket;
use crate::space::{Pose, Vec3};

/// Tunables the session reads each frame.
#[derive(Clone, Debug)]
pub struct SessionParams {
    pub probe_radius: f32,
    pub base_freq_hz: f32,
    pub haptic_pulse: Duration,
    pub beacon_interval: u64,
    pub name: String,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            probe_radius: 0.03,
            base_freq_hz: 110.0,
            haptic_pulse: Duration::from_millis(100),
            beacon_interval: 60,
            name: "player".to_string(),
        }
    }
}

/// The interaction loop: owns the chime row, the live probe set, and the
/// pose beacon; `update` is one frame.
pub struct Session {
    row: ChimeRow,
    probes: Vec<Probe>,
    head: Pose,
    beacon: Beacon,
    params: SessionParams,
    frame: u64,
    next_probe_id: u32,
}

impl Session {
    #[must_use]
    pub fn new(layout: &RowLayout, params: SessionParams) -> Self {
        Self {
            row: ChimeRow::new(layout),
            probes: Vec::new(),
            head: Pose::default(),
            beacon: Beacon::new(params.beacon_interval),
            params,
            frame: 0,
            next_probe_id: 0,
        }
    }

    /// Handle a device-connect event. The tone generator is claimed
    /// lazily on the first frame the bank reports ready.
    pub fn connect_probe(&mut self, spec: ProbeSpec) -> ProbeId {
        let id = ProbeId::new(self.next_probe_id);
        self.next_probe_id += 1;
        self.probes.push(Probe::new(id, spec));
        debug!(probe = id.raw(), "probe connected");
        id
    }

    /// Handle a device-disconnect event. Tears the probe's tone down
    /// synchronously so nothing stays routed past this call; an unknown
    /// id is a no-op.
    pub fn disconnect_probe(&mut self, bank: &mut dyn ToneBank, id: ProbeId) {
        let Some(index) = self.probes.iter().position(|p| p.id() == id) else {
            debug!(probe = id.raw(), "disconnect for unknown probe");
            return;
        };
        let mut probe = self.probes.remove(index);
        let tone = probe.tone();
        probe.channel_mut().silence(bank, tone);
        if let Some(handle) = tone {
            bank.release(handle);
        }
        debug!(probe = id.raw(), "probe disconnected");
    }

    /// External per-frame position sample. Unknown ids are ignored.
    pub fn set_probe_position(&mut self, id: ProbeId, position: Vec3) {
        if let Some(probe) = self.probes.iter_mut().find(|p| p.id() == id) {
            probe.set_position(position);
        }
    }

    pub fn set_head_pose(&mut self, pose: Pose) {
        self.head = pose;
    }

    #[must_use]
    pub fn row(&self) -> &ChimeRow {
        &self.row
    }

    #[must_use]
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    #[must_use]
    pub fn probe(&self, id: ProbeId) -> Option<&Probe> {
        self.probes.iter().find(|p| p.id() == id)
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame: collision sweep over every probe, tone and haptic
    /// updates, visual reset, then the beacon on its own cadence. Returns
    /// the pose packet when the beacon fires; the caller owns delivery.
    pub fn update(
        &mut self,
        bank: &mut dyn ToneBank,
        haptics: &mut dyn HapticSink,
    ) -> Option<PosePacket> {
        self.frame += 1;
        self.row.clear_touches();

        for probe in &mut self.probes {
            let contact = sweep_probe(&mut self.row, probe.position(), self.params.probe_radius);
            probe.set_touching(contact.touching);

            if probe.tone().is_none() && bank.ready() {
                probe.set_tone(bank.allocate());
            }

            if let Some(index) = contact.last_index
                && probe.supports_haptics()
            {
                haptics.pulse(probe.id(), self.row.intensity(index), self.params.haptic_pulse);
            }

            let touch_hz = contact
                .last_index
                .map(|index| rank_frequency_hz(self.params.base_freq_hz, index + 1));
            let tone = probe.tone();
            probe.channel_mut().update(bank, tone, touch_hz);
        }

        self.row.reset_untouched();

        if self.beacon.due() {
            Some(self.pose_packet())
        } else {
            None
        }
    }

    fn pose_packet(&mut self) -> PosePacket {
        fn hand_position(probes: &[Probe], hand: Hand) -> Option<Vec3> {
            probes
                .iter()
                .find(|p| p.hand() == hand)
                .map(|p| p.position())
        }
        let left = hand_position(&self.probes, Hand::Left);
        let right = hand_position(&self.probes, Hand::Right);
        PosePacket {
            name: self.params.name.clone(),
            seq: self.beacon.next_seq(),
            head: self.head,
            left,
            right,
        }
    }
}
