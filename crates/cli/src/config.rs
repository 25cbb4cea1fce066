//! Command-line configuration.

use crate::commands::Command;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "topology-inspect")]
#[command(about = "Inspect and replay cluster topology consensus", long_about = None)]
#[command(version)]
pub struct CliConfig {
    /// Log resolution details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        let default_level = if self.verbose { "debug" } else { "warn" };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();

        let result = self.command.execute()?;
        println!("{}", result.output);
        Ok(())
    }
}
