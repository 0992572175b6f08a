mod config;
mod run;
mod stats;

use anyhow::Result;

fn main() -> Result<()> {
    run::initialise_tracing();
    run::run()
}
