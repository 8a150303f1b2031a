use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "raplog",
    about = "RAPL powercap energy sampler - streams CSV energy telemetry on Linux",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output as JSON instead of formatted tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sample energy counters on a fixed cadence and stream CSV to stdout
    Run {
        /// Trigger period in milliseconds (overrides config files)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Read configuration from this file instead of the system/user files
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Resolve the available RAPL power domains and show them, then exit
    List,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: raplog completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(shell, &mut Cli::command(), "raplog", &mut std::io::stdout());
}
