use serde::{Deserialize, Serialize};

use crate::audio::bank::ToneHandle;
use crate::instrument::tone::ToneChannel;
use crate::space::Vec3;

/// Stable identity of a connected input device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeId(u32);

impl ProbeId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

/// What a device-connect event tells us about the controller.
#[derive(Clone, Copy, Debug)]
pub struct ProbeSpec {
    pub hand: Hand,
    pub supports_haptics: bool,
}

/// One tracked controller. Position is sampled externally each frame;
/// interaction state belongs to the frame loop.
#[derive(Debug)]
pub struct Probe {
    id: ProbeId,
    hand: Hand,
    supports_haptics: bool,
    position: Vec3,
    touching: bool,
    tone: Option<ToneHandle>,
    channel: ToneChannel,
}

impl Probe {
    #[must_use]
    pub fn new(id: ProbeId, spec: ProbeSpec) -> Self {
        Self {
            id,
            hand: spec.hand,
            supports_haptics: spec.supports_haptics,
            position: Vec3::zero(),
            touching: false,
            tone: None,
            channel: ToneChannel::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ProbeId {
        self.id
    }

    #[must_use]
    pub fn hand(&self) -> Hand {
        self.hand
    }

    #[must_use]
    pub fn supports_haptics(&self) -> bool {
        self.supports_haptics
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[must_use]
    pub fn touching(&self) -> bool {
        self.touching
    }

    pub(crate) fn set_touching(&mut self, touching: bool) {
        self.touching = touching;
    }

    #[must_use]
    pub fn tone(&self) -> Option<ToneHandle> {
        self.tone
    }

    pub(crate) fn set_tone(&mut self, tone: Option<ToneHandle>) {
        self.tone = tone;
    }

    pub(crate) fn channel_mut(&mut self) -> &mut ToneChannel {
        &mut self.channel
    }

    #[must_use]
    pub fn sounding(&self) -> bool {
        self.channel.sounding()
    }
}
