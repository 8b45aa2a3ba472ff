use crossbeam_channel::Receiver;
use tracing::debug;

use crate::net::beacon::fan_out;
use crate::net::link::PeerLink;
use crate::net::packet::PosePacket;

/// Fan-out worker: owns the peer links so slow or stalled peers never
/// touch the frame thread. The frame side `try_send`s into a bounded
/// channel and drops the beacon when it is full.
///
/// Stale presence is worthless, so the backlog is drained to the newest
/// packet before sending.
pub fn run(rx: Receiver<PosePacket>, mut links: Vec<Box<dyn PeerLink>>) {
    while let Ok(mut packet) = rx.recv() {
        for newer in rx.try_iter() {
            packet = newer;
        }
        let delivered = fan_out(&mut links, &packet);
        debug!(seq = packet.seq, delivered, peers = links.len(), "beacon out");
    }
    debug!("beacon channel closed, net worker exiting");
}
