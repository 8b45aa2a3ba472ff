use std::io::{BufRead, BufReader};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::bounded;

use carillon::net::link::{LinkError, PeerLink, TcpLink};
use carillon::net::packet::PosePacket;
use carillon::net::worker;
use carillon::space::{Pose, Vec3};

fn sample_packet(seq: u64) -> PosePacket {
    PosePacket {
        name: "ada".to_string(),
        seq,
        head: Pose::default(),
        left: Some(Vec3::new(-0.5, 0.5, 0.0)),
        right: Some(Vec3::new(0.5, 0.5, 0.0)),
    }
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

#[test]
fn worker_delivers_and_exits_on_channel_close() {
    let hits = Arc::new(AtomicUsize::new(0));
    let links: Vec<Box<dyn PeerLink>> = vec![Box::new(CountingLink { hits: hits.clone() })];

    let (tx, rx) = bounded::<PosePacket>(4);
    let handle = thread::spawn(move || worker::run(rx, links));

    tx.send(sample_packet(1)).expect("send");
    drop(tx);
    handle.join().expect("worker exits cleanly");

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn tcp_link_writes_one_json_line_per_packet() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr").to_string();

    let reader = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut lines = BufReader::new(stream).lines();
        let first = lines.next().expect("a line").expect("read");
        let second = lines.next().expect("a line").expect("read");
        (first, second)
    });

    let mut link = TcpLink::connect(&addr).expect("connect");
    assert_eq!(link.label(), addr);
    link.send(&sample_packet(1)).expect("send");
    link.send(&sample_packet(2)).expect("send");
    drop(link);

    let (first, second) = reader.join().expect("reader");
    let a: PosePacket = serde_json::from_str(&first).expect("decode");
    let b: PosePacket = serde_json::from_str(&second).expect("decode");
    assert_eq!(a, sample_packet(1));
    assert_eq!(b.seq, 2);
}
