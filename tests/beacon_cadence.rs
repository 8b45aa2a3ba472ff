use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use carillon::audio::bank::recording::RecordingBank;
use carillon::instrument::chime::RowLayout;
use carillon::instrument::haptics::NullHaptics;
use carillon::instrument::{Hand, ProbeSpec, Session, SessionParams};
use carillon::net::fan_out;
use carillon::net::link::{LinkError, PeerLink};
use carillon::net::packet::PosePacket;
use carillon::space::{Orientation, Pose, Vec3};

fn session_with_interval(interval: u64) -> Session {
    Session::new(
        &RowLayout::default(),
        SessionParams {
            beacon_interval: interval,
            name: "ada".to_string(),
            ..SessionParams::default()
        },
    )
}

#[test]
fn fires_exactly_once_per_window() {
    let mut session = session_with_interval(60);
    let mut bank = RecordingBank::started();
    let mut haptics = NullHaptics;

    let mut fired_at = Vec::new();
    for _ in 0..240 {
        if session.update(&mut bank, &mut haptics).is_some() {
            fired_at.push(session.frame());
        }
    }
    assert_eq!(fired_at, vec![60, 120, 180, 240]);
}

#[test]
fn zero_interval_disables_the_beacon() {
    let mut session = session_with_interval(0);
    let mut bank = RecordingBank::started();
    let mut haptics = NullHaptics;

    for _ in 0..200 {
        assert!(session.update(&mut bank, &mut haptics).is_none());
    }
}

#[test]
fn packet_carries_identity_head_and_hands() {
    let mut session = session_with_interval(2);
    let mut bank = RecordingBank::started();
    let mut haptics = NullHaptics;

    let left = session.connect_probe(ProbeSpec {
        hand: Hand::Left,
        supports_haptics: false,
    });
    session.set_probe_position(left, Vec3::new(-0.4, 1.1, -0.2));
    session.set_head_pose(Pose::new(
        Vec3::new(0.0, 1.6, 3.0),
        Orientation::new(0.3, -0.1, 0.0),
    ));

    session.update(&mut bank, &mut haptics);
    let packet = session
        .update(&mut bank, &mut haptics)
        .expect("beacon due on frame 2");

    assert_eq!(packet.name, "ada");
    assert_eq!(packet.seq, 1);
    assert_eq!(packet.head.position, Vec3::new(0.0, 1.6, 3.0));
    assert_eq!(packet.left, Some(Vec3::new(-0.4, 1.1, -0.2)));
    assert_eq!(packet.right, None, "no right hand connected");

    // seq rises across beacons
    session.update(&mut bank, &mut haptics);
    let packet = session.update(&mut bank, &mut haptics).expect("next beacon");
    assert_eq!(packet.seq, 2);
}

struct CountingLink {
    hits: Arc<AtomicUsize>,
}

impl PeerLink for CountingLink {
    fn label(&self) -> &str {
        "counting"
    }

    fn send(&mut self, _packet: &PosePacket) -> Result<(), LinkError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct BrokenLink;

impl PeerLink for BrokenLink {
    fn label(&self) -> &str {
        "broken"
    }

    fn send(&mut self, _packet: &PosePacket) -> Result<(), LinkError> {
        Err(LinkError::Io(std::io::Error::other("peer gone")))
    }
}

fn sample_packet(seq: u64) -> PosePacket {
    PosePacket {
        name: "ada".to_string(),
        seq,
        head: Pose::default(),
        left: None,
        right: None,
    }
}

#[test]
fn one_failing_peer_does_not_suppress_the_rest() {
    let before = Arc::new(AtomicUsize::new(0));
    let after = Arc::new(AtomicUsize::new(0));
    let mut links: Vec<Box<dyn PeerLink>> = vec![
        Box::new(CountingLink {
            hits: before.clone(),
        }),
        Box::new(BrokenLink),
        Box::new(CountingLink {
            hits: after.clone(),
        }),
    ];

    for seq in 1..=3 {
        let delivered = fan_out(&mut links, &sample_packet(seq));
        assert_eq!(delivered, 2);
    }

    assert_eq!(before.load(Ordering::SeqCst), 3);
    assert_eq!(after.load(Ordering::SeqCst), 3, "link after the failure still served");
}
