use clap::Parser;

use notify_sinks::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}
