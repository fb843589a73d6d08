//! Node configuration: defaults overridden from the environment.

use std::time::Duration;
use tracing::warn;

/// Which consensus variant this node runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    ProofOfWork,
    ProofOfStake,
}

/// Runtime configuration for one node process.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub mode: Mode,
    /// Port the peer sync listener binds.
    pub p2p_port: u16,
    /// Port the producer console listener binds.
    pub console_port: u16,
    /// Optional peer address to dial (`host:port`).
    pub peer: Option<String>,
    /// Leading-zero hex characters a PoW digest must carry.
    pub difficulty: u32,
    /// Stake-lottery round period.
    pub round_interval: Duration,
    /// Outbound peer broadcast period.
    pub sync_interval: Duration,
    /// Period between chain dumps to each console session.
    pub dump_interval: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::ProofOfStake,
            p2p_port: 9000,
            console_port: 9100,
            peer: None,
            difficulty: 2,
            round_interval: Duration::from_secs(30),
            sync_interval: Duration::from_secs(5),
            dump_interval: Duration::from_secs(60),
        }
    }
}

impl NodeConfig {
    /// Load configuration from the environment over the defaults.
    ///
    /// | Variable | Default | Meaning |
    /// |---|---|---|
    /// | `PULSE_MODE` | `stake` | `pow` or `stake` |
    /// | `PULSE_P2P_PORT` | `9000` | peer sync listener |
    /// | `PULSE_CONSOLE_PORT` | `9100` | producer console listener |
    /// | `PULSE_PEER` | unset | peer to dial |
    /// | `PULSE_DIFFICULTY` | `2` | PoW leading-zero count |
    /// | `PULSE_ROUND_SECS` | `30` | lottery round period |
    /// | `PULSE_SYNC_SECS` | `5` | peer broadcast period |
    /// | `PULSE_DUMP_SECS` | `60` | console chain dump period |
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(mode) = std::env::var("PULSE_MODE") {
            match mode.as_str() {
                "pow" => config.mode = Mode::ProofOfWork,
                "stake" => config.mode = Mode::ProofOfStake,
                other => warn!(mode = other, "unknown PULSE_MODE, keeping default"),
            }
        }
        if let Some(port) = env_parse("PULSE_P2P_PORT") {
            config.p2p_port = port;
        }
        if let Some(port) = env_parse("PULSE_CONSOLE_PORT") {
            config.console_port = port;
        }
        if let Ok(peer) = std::env::var("PULSE_PEER") {
            if !peer.is_empty() {
                config.peer = Some(peer);
            }
        }
        if let Some(difficulty) = env_parse("PULSE_DIFFICULTY") {
            config.difficulty = difficulty;
        }
        if let Some(secs) = env_parse("PULSE_ROUND_SECS") {
            config.round_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("PULSE_SYNC_SECS") {
            config.sync_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("PULSE_DUMP_SECS") {
            config.dump_interval = Duration::from_secs(secs);
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value = %value, "unparseable value, keeping default");
            None
        }
    }
}
