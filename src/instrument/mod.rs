pub mod chime;
pub mod collision;
pub mod haptics;
pub mod probe;
pub mod scale;
pub mod session;
pub mod tone;

pub use chime::{Chime, ChimeRow, RowLayout};
pub use probe::{Hand, Probe, ProbeId, ProbeSpec};
pub use session::{Session, SessionParams};
