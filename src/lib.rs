//! Real-time interaction core for a shared VR chime instrument:
//! probe-vs-chime collision, edge-triggered tone routing, haptic
//! confirmation, and a periodic pose beacon to remote peers.

pub mod audio;
pub mod config;
pub mod instrument;
pub mod net;
pub mod space;
