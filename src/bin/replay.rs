use std::fs;
use std::path::PathBuf;

use clap::Parser;
use price_estimation_round_machine::config::CommitteeConfig;
use price_estimation_round_machine::{CoreError, Payload, PeriodDriver};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Replays a recorded sequence of payloads through the period state machine and
/// prints the round transitions it makes. Useful for inspecting a captured session
/// locally; the library itself never touches the filesystem.
#[derive(Parser, Debug)]
#[command(name = "price-estimation-round-machine")]
struct Cli {
    /// Path to a TOML file with `max_participants` and `consensus_threshold`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a newline-delimited JSON file of `PayloadRecord`s.
    #[arg(long)]
    payloads: PathBuf,
}

/// One line of the payload-replay file: a payload, and whether it closes the block
/// it arrived in (driving an `end_block` call after it is applied).
#[derive(Deserialize, Debug)]
struct PayloadRecord {
    payload: Payload,
    end_block: bool,
}

fn main() -> Result<(), CoreError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CommitteeConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => CommitteeConfig::default(),
    };
    let params = config.into_params()?;
    let mut driver = PeriodDriver::new(params);

    let contents = fs::read_to_string(&cli.payloads)?;
    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        let record: PayloadRecord = serde_json::from_str(line)?;
        driver.apply(record.payload);
        if record.end_block {
            driver.end_block();
        }
    }

    log::info!("final round: {}", driver.current_round_id());
    Ok(())
}
