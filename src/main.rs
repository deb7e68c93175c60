use anyhow::Result;
use tracing::info;

use batyrov_byline::logging::{self, LogConfig};
use batyrov_byline::{get_banner, speak_banner};

/// Read the banner aloud on every run (needs espeak-ng or espeak; Ctrl+C stops it)
const SPEAK_ON_RUN: bool = false;

fn main() -> Result<()> {
    logging::init(&LogConfig::default())?;

    info!("STARTING main()..");
    info!("Byline:\n{}", get_banner());

    if SPEAK_ON_RUN {
        speak_banner();
    }

    info!("This module is organized like all Rust crates.");
    info!("We write professional Rust from the start.");
    info!("END main()...");

    Ok(())
}
