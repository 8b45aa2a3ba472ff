use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Play audio in realtime
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    pub play: bool,

    /// Write audio to wav file
    #[arg(long)]
    pub wav: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "carillon.toml")]
    pub config: String,

    /// Participant name sent in pose beacons (overrides config)
    #[arg(long)]
    pub name: Option<String>,

    /// Peer address to beacon to, host:port (repeatable, overrides config)
    #[arg(long = "peer")]
    pub peers: Vec<String>,

    /// Number of frames to run; 0 runs until Ctrl-C
    #[arg(long, default_value_t = 0)]
    pub frames: u64,
}
