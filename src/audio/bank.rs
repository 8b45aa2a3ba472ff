/// Handle to one continuously running generator inside a bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToneHandle(usize);

impl ToneHandle {
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// Consumed audio backend surface.
///
/// A generator runs for its whole lifetime; only `connect`/`disconnect`
/// gate whether it reaches the sink. All calls are fire-and-forget:
/// implementations must not block the frame, and disconnecting an
/// already-disconnected generator is a no-op.
pub trait ToneBank {
    /// Whether the backend is live. `allocate` returns `None` until then.
    fn ready(&self) -> bool;

    /// Claim a generator. `None` when the backend is not ready or out of
    /// slots; callers treat that as "stay silent", never as an error.
    fn allocate(&mut self) -> Option<ToneHandle>;

    /// Return a generator. Implies disconnect.
    fn release(&mut self, handle: ToneHandle);

    fn set_frequency(&mut self, handle: ToneHandle, hz: f32);

    fn connect(&mut self, handle: ToneHandle);

    fn disconnect(&mut self, handle: ToneHandle);
}

/// The not-yet-activated backend: never ready, swallows every call.
#[derive(Debug, Default)]
pub struct SilentBank;

impl ToneBank for SilentBank {
    fn ready(&self) -> bool {
        false
    }

    fn allocate(&mut self) -> Option<ToneHandle> {
        None
    }

    fn release(&mut self, _handle: ToneHandle) {}

    fn set_frequency(&mut self, _handle: ToneHandle, _hz: f32) {}

    fn connect(&mut self, _handle: ToneHandle) {}

    fn disconnect(&mut self, _handle: ToneHandle) {}
}

/// Call-recording bank for state-machine tests.
pub mod recording {
    use super::{ToneBank, ToneHandle};

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum BankCall {
        Allocate(ToneHandle),
        Release(ToneHandle),
        SetFrequency(ToneHandle, f32),
        Connect(ToneHandle),
        Disconnect(ToneHandle),
    }

    #[derive(Debug, Default)]
    pub struct RecordingBank {
        ready: bool,
        next: usize,
        calls: Vec<BankCall>,
    }

    impl RecordingBank {
        /// A bank that is live from the start.
        #[must_use]
        pub fn started() -> Self {
            Self {
                ready: true,
                ..Self::default()
            }
        }

        /// A bank that has not been activated yet.
        #[must_use]
        pub fn unstarted() -> Self {
            Self::default()
        }

        pub fn set_ready(&mut self, ready: bool) {
            self.ready = ready;
        }

        /// Allocate outside the recorded stream, for test setup.
        pub fn force_allocate(&mut self) -> ToneHandle {
            let handle = ToneHandle::from_index(self.next);
            self.next += 1;
            handle
        }

        #[must_use]
        pub fn calls(&self) -> &[BankCall] {
            &self.calls
        }

        pub fn clear_calls(&mut self) {
            self.calls.clear();
        }
    }

    impl ToneBank for RecordingBank {
        fn ready(&self) -> bool {
            self.ready
        }

        fn allocate(&mut self) -> Option<ToneHandle> {
            if !self.ready {
                return None;
            }
            let handle = ToneHandle::from_index(self.next);
            self.next += 1;
            self.calls.push(BankCall::Allocate(handle));
            Some(handle)
        }

        fn release(&mut self, handle: ToneHandle) {
            self.calls.push(BankCall::Release(handle));
        }

        fn set_frequency(&mut self, handle: ToneHandle, hz: f32) {
            self.calls.push(BankCall::SetFrequency(handle, hz));
        }

        fn connect(&mut self, handle: ToneHandle) {
            self.calls.push(BankCall::Connect(handle));
        }

        fn disconnect(&mut self, handle: ToneHandle) {
            self.calls.push(BankCall::Disconnect(handle));
        }
    }
}
