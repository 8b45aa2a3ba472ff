pub mod beacon;
pub mod link;
pub mod packet;
pub mod worker;

pub use beacon::{Beacon, fan_out};
pub use link::{LinkError, LoopbackLink, PeerLink, TcpLink};
pub use packet::PosePacket;
