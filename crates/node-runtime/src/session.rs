//! Producer console sessions.
//!
//! Line-oriented TCP protocol, one task per connected producer. Stake
//! mode opens with a token-balance prompt that registers the validator;
//! both modes then loop on BPM readings. A non-numeric line terminates
//! the session, and in stake mode also forfeits the producer's stake —
//! that loss is the deterrent, so there is deliberately no way to
//! re-register on the same session.

use crate::config::{Mode, NodeConfig};
use crate::now_ms;
use anyhow::Result;
use pulse_consensus::{is_valid_next, seal_block};
use pulse_propagation::{Announcement, Coordinator};
use pulse_types::Block;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Accept producer consoles forever, one session task per connection.
pub async fn serve_console(
    listener: TcpListener,
    coordinator: Arc<Coordinator>,
    config: NodeConfig,
) -> Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        info!(producer = %addr, "console connected");
        let coordinator = Arc::clone(&coordinator);
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_session(stream, coordinator, config).await {
                warn!(producer = %addr, %err, "console session ended");
            }
        });
    }
}

/// Drive one producer session to completion.
pub async fn handle_session(
    stream: TcpStream,
    coordinator: Arc<Coordinator>,
    config: NodeConfig,
) -> Result<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut announcements = coordinator.subscribe();
    let mut dump = tokio::time::interval(config.dump_interval);
    dump.tick().await; // the first tick is immediate; skip it

    // Stake mode: the producer stakes tokens and becomes a validator.
    // No balance check — there is no wallet model.
    let address = match config.mode {
        Mode::ProofOfStake => {
            writer.write_all(b"Enter token balance:").await?;
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            let stake: u64 = match line.trim().parse() {
                Ok(stake) => stake,
                Err(_) => {
                    warn!(input = %line.trim(), "not a number, closing session");
                    return Ok(());
                }
            };
            Some(coordinator.registry().register(stake, now_ms()))
        }
        Mode::ProofOfWork => None,
    };

    writer.write_all(b"\nEnter a new BPM:").await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break; // producer hung up
                };
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let bpm: i64 = match input.parse() {
                    Ok(bpm) => bpm,
                    Err(_) => {
                        warn!(input = %input, "non-numeric BPM, terminating session");
                        if let Some(address) = &address {
                            coordinator.registry().forfeit(address);
                        }
                        break;
                    }
                };
                submit_reading(&coordinator, &config, address.as_deref(), bpm).await?;
                writer.write_all(b"\nEnter a new BPM:").await?;
            }
            announcement = announcements.recv() => {
                match announcement {
                    Ok(a) => write_announcement(&mut writer, &a).await?,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "session lagged behind announcements");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            _ = dump.tick() => {
                let chain = serde_json::to_string(&coordinator.store().snapshot())?;
                writer.write_all(chain.as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
        }
    }
    Ok(())
}

/// Turn one BPM reading into a block proposal.
///
/// Stake mode: build a candidate on the current tip, stamp the
/// validator and enqueue it for the next lottery round. PoW mode: seal
/// at the configured difficulty and append immediately. An invalid or
/// stale block is dropped silently — the producer may retry.
async fn submit_reading(
    coordinator: &Arc<Coordinator>,
    config: &NodeConfig,
    address: Option<&str>,
    bpm: i64,
) -> Result<()> {
    match config.mode {
        Mode::ProofOfStake => {
            let tip = coordinator.store().tip();
            let mut candidate = Block::next(&tip, bpm, now_ms());
            candidate.validator = address.map(str::to_owned);
            if let Err(err) = is_valid_next(&candidate, &tip) {
                debug!(%err, "candidate invalid at build time, dropped");
                return Ok(());
            }
            coordinator.submit_candidate(candidate);
        }
        Mode::ProofOfWork => {
            let tip = coordinator.store().tip();
            let difficulty = config.difficulty;
            let timestamp = now_ms();
            // The nonce search is CPU-bound; keep it off the I/O tasks.
            let sealed =
                tokio::task::spawn_blocking(move || seal_block(&tip, bpm, difficulty, timestamp))
                    .await?;
            if let Err(err) = coordinator.submit_block(sealed) {
                debug!(%err, "sealed block lost the race to the tip, dropped");
            }
        }
    }
    Ok(())
}

async fn write_announcement(writer: &mut OwnedWriteHalf, announcement: &Announcement) -> Result<()> {
    let text = match announcement {
        Announcement::WinnerElected { validator, .. } => {
            format!("\nwinning validator: {validator}\n")
        }
        Announcement::BlockAppended { index, payload } => {
            format!("\nblock {index} appended (BPM {payload})\n")
        }
    };
    writer.write_all(text.as_bytes()).await?;
    Ok(())
}
