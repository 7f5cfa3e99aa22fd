//! Dirstream CLI: list one directory through built-in plugins.

use anyhow::Result;
use clap::Parser;
use dirstream::engine::arg_parser::Cli;
use dirstream::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
