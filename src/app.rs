use std::error::Error;
use std::f32::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Sender, bounded};
use tracing::{debug, info, warn};

use carillon::audio::AudioSystem;
use carillon::config::AppConfig;
use carillon::instrument::haptics::LoggingHaptics;
use carillon::instrument::{Hand, ProbeSpec, Session};
use carillon::net::packet::PosePacket;
use carillon::net::{PeerLink, TcpLink, worker};
use carillon::space::{Orientation, Pose, Vec3};

use crate::cli::Args;

const FRAME_RATE: f32 = 60.0;

/// Stand-in for the excluded XR input layer: two hands glide across the
/// row in opposite phase, brushing every chime in turn.
struct SweepDriver {
    center_x: f32,
    amplitude: f32,
    z: f32,
}

impl SweepDriver {
    fn new() -> Self {
        Self {
            center_x: -0.075,
            amplitude: 0.7,
            z: -0.5,
        }
    }

    fn position(&self, hand: Hand, t_sec: f32) -> Vec3 {
        let phase = match hand {
            Hand::Left => 0.0,
            Hand::Right => TAU / 2.0,
        };
        let x = self.center_x + self.amplitude * (TAU * 0.25 * t_sec + phase).sin();
        Vec3::new(x, 0.9, self.z)
    }
}

fn connect_peers(addrs: &[String]) -> Vec<Box<dyn PeerLink>> {
    let mut links: Vec<Box<dyn PeerLink>> = Vec::new();
    for addr in addrs {
        match TcpLink::connect(addr) {
            Ok(link) => {
                info!(peer = addr.as_str(), "peer connected");
                links.push(Box::new(link));
            }
            Err(err) => warn!(peer = addr.as_str(), %err, "peer unreachable, skipping"),
        }
    }
    links
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut cfg = AppConfig::load_or_default(&args.config);
    if let Some(name) = &args.name {
        cfg.network.name = name.clone();
    }
    if !args.peers.is_empty() {
        cfg.network.peers = args.peers.clone();
    }

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_for_ctrlc = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_for_ctrlc.store(true, Ordering::SeqCst);
    })?;

    // Launching with --play is the explicit user action that gates
    // audio startup.
    let mut audio = AudioSystem::new();
    audio.activate(&cfg.audio, args.play, args.wav.as_deref());

    let links = connect_peers(&cfg.network.peers);
    let (net_tx, net_worker): (Option<Sender<PosePacket>>, Option<thread::JoinHandle<()>>) =
        if links.is_empty() {
            (None, None)
        } else {
            let (tx, rx) = bounded::<PosePacket>(4);
            let handle = thread::Builder::new()
                .name("net".into())
                .spawn(move || worker::run(rx, links))?;
            (Some(tx), Some(handle))
        };

    let mut session = Session::new(&cfg.instrument.layout(), cfg.session_params());
    let left = session.connect_probe(ProbeSpec {
        hand: Hand::Left,
        supports_haptics: true,
    });
    let right = session.connect_probe(ProbeSpec {
        hand: Hand::Right,
        supports_haptics: true,
    });

    let mut haptics = LoggingHaptics;
    let driver = SweepDriver::new();
    let frame_duration = Duration::from_secs_f32(1.0 / FRAME_RATE);
    let mut next_deadline = Instant::now();

    info!(
        chimes = session.row().len(),
        peers = cfg.network.peers.len(),
        "session running"
    );

    loop {
        if stop_flag.load(Ordering::SeqCst) {
            info!("stop requested, shutting down");
            break;
        }
        if args.frames > 0 && session.frame() >= args.frames {
            break;
        }

        let t_sec = session.frame() as f32 / FRAME_RATE;
        session.set_probe_position(left, driver.position(Hand::Left, t_sec));
        session.set_probe_position(right, driver.position(Hand::Right, t_sec));
        session.set_head_pose(Pose::new(
            Vec3::new(0.0, 1.6, 3.0),
            Orientation::new(0.1 * t_sec, 0.0, 0.0),
        ));

        let packet = session.update(audio.bank(), &mut haptics);
        if let Some(packet) = packet
            && let Some(tx) = &net_tx
        {
            // Fire-and-forget: a full channel drops this beacon.
            let _ = tx.try_send(packet);
        }

        if session.frame().is_multiple_of(120) {
            let lit = session.row().chimes().iter().filter(|c| c.lit()).count();
            let sounding = session.probes().iter().filter(|p| p.sounding()).count();
            debug!(frame = session.frame(), lit, sounding, "frame");
        }

        next_deadline += frame_duration;
        let now = Instant::now();
        if next_deadline > now {
            thread::sleep(next_deadline - now);
        }
    }

    // Tear down in dependency order: probes release their tones, the
    // beacon channel closes, then the audio engine unwinds on drop.
    session.disconnect_probe(audio.bank(), left);
    session.disconnect_probe(audio.bank(), right);
    drop(net_tx);
    if let Some(handle) = net_worker {
        let _ = handle.join();
    }

    Ok(())
}
