use std::fmt;
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

use crate::net::packet::PosePacket;

#[derive(Debug)]
pub enum LinkError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Io(e) => write!(f, "link I/O error: {e}"),
            LinkError::Encode(e) => write!(f, "packet encode error: {e}"),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<std::io::Error> for LinkError {
    fn from(e: std::io::Error) -> Self {
        LinkError::Io(e)
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(e: serde_json::Error) -> Self {
        LinkError::Encode(e)
    }
}

/// One remote participant. The link set is managed outside the frame
/// loop; a link failing affects that link only.
pub trait PeerLink: Send {
    /// Human-readable peer name for log lines.
    fn label(&self) -> &str;

    fn send(&mut self, packet: &PosePacket) -> Result<(), LinkError>;
}

/// Newline-delimited JSON over TCP, the "send object to group" primitive
/// the surrounding system expects. Writes carry a short timeout so one
/// stalled peer cannot wedge the fan-out thread.
pub struct TcpLink {
    addr: String,
    stream: TcpStream,
}

impl TcpLink {
    pub fn connect(addr: &str) -> Result<Self, LinkError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        stream.set_write_timeout(Some(Duration::from_millis(250)))?;
        Ok(Self {
            addr: addr.to_string(),
            stream,
        })
    }
}

impl PeerLink for TcpLink {
    fn label(&self) -> &str {
        &self.addr
    }

    fn send(&mut self, packet: &PosePacket) -> Result<(), LinkError> {
        let mut line = serde_json::to_vec(packet)?;
        line.push(b'\n');
        self.stream.write_all(&line)?;
        Ok(())
    }
}

/// In-memory link: keeps every packet it is handed. Used by tests and by
/// the demo when no peer address is configured.
#[derive(Debug, Default)]
pub struct LoopbackLink {
    label: String,
    packets: Vec<PosePacket>,
}

impl LoopbackLink {
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            packets: Vec::new(),
        }
    }

    #[must_use]
    pub fn packets(&self) -> &[PosePacket] {
        &self.packets
    }
}

impl PeerLink for LoopbackLink {
    fn label(&self) -> &str {
        &self.label
    }

    fn send(&mut self, packet: &PosePacket) -> Result<(), LinkError> {
        self.packets.push(packet.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Pose;

    #[test]
    fn loopback_keeps_everything_in_order() {
        let mut link = LoopbackLink::new("local");
        for seq in 1..=3 {
            let packet = PosePacket {
                name: "ada".to_string(),
                seq,
                head: Pose::default(),
                left: None,
                right: None,
            };
            link.send(&packet).expect("loopback never fails");
        }
        let seqs: Vec<u64> = link.packets().iter().map(|p| p.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }
}
