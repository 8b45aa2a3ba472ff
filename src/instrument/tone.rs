use crate::audio::bank::{ToneBank, ToneHandle};

/// Routing state of one probe's generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneState {
    #[default]
    Silent,
    Sounding,
}

/// Edge-triggered driver for a probe's tone generator.
///
/// Connect and disconnect fire only on state transitions; frequency
/// tracks the touched chime every frame while sounding, so sweeping a
/// probe across the row glides through the scale without re-triggering.
#[derive(Debug, Default)]
pub struct ToneChannel {
    state: ToneState,
}

impl ToneChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ToneState {
        self.state
    }

    #[must_use]
    pub fn sounding(&self) -> bool {
        self.state == ToneState::Sounding
    }

    /// Advance one frame. `touch_hz` is `Some(frequency)` while the probe
    /// touches at least one chime. Without a handle the generator is not
    /// ready; the channel stays silent and issues no backend calls.
    pub fn update(&mut self, bank: &mut dyn ToneBank, handle: Option<ToneHandle>, touch_hz: Option<f32>) {
        let Some(handle) = handle else {
            self.state = ToneState::Silent;
            return;
        };
        match (self.state, touch_hz) {
            (ToneState::Silent, Some(hz)) => {
                bank.set_frequency(handle, hz);
                bank.connect(handle);
                self.state = ToneState::Sounding;
            }
            (ToneState::Sounding, Some(hz)) => {
                bank.set_frequency(handle, hz);
            }
            (ToneState::Sounding, None) => {
                bank.disconnect(handle);
                self.state = ToneState::Silent;
            }
            (ToneState::Silent, None) => {}
        }
    }

    /// Tear down on probe disconnect: unroute if sounding, then go silent.
    /// Safe to call in any state.
    pub fn silence(&mut self, bank: &mut dyn ToneBank, handle: Option<ToneHandle>) {
        if self.state == ToneState::Sounding
            && let Some(handle) = handle
        {
            bank.disconnect(handle);
        }
        self.state = ToneState::Silent;
    }
}
