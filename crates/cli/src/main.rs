//! Encounter resolution session binary.
//!
//! Seeds in-memory stores from the bundled content files, then generates a
//! fresh encounter, resolves a battle, attempts a capture, and pays out
//! adventure completion rewards. The session report is printed to stdout as
//! JSON; logs go to stderr.
//!
//! ```bash
//! ENCOUNTER_RNG_SEED=7 RUST_LOG=debug cargo run -p encounter-cli
//! ```

mod session;

use anyhow::Result;
use encounter_runtime::RuntimeConfig;
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    tracing::info!("Starting encounter session");
    tracing::info!("RNG seed: {:?}", config.rng_seed);
    tracing::info!("Capture retries: {}", config.capture_retries);

    let session = Session::load(config)?;
    let report = session.run().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
