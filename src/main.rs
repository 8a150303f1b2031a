use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use raplog::cli::{Cli, Command};
use raplog::config::RaplogConfig;
use raplog::domains::{self, POWERCAP_BASE};
use raplog::output::{self, CsvWriter};
use raplog::sampler;
use raplog::scheduler::Scheduler;
use raplog::sysfs::SysfsRoot;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            interval_ms,
            config,
        } => cmd_run(interval_ms, config)?,
        Command::List => cmd_list(cli.json)?,
        Command::Completions { shell } => raplog::cli::print_completions(shell),
    }

    Ok(())
}

fn cmd_run(interval_ms: Option<u64>, config_path: Option<PathBuf>) -> Result<()> {
    let config = match &config_path {
        Some(path) => RaplogConfig::load_from(path)?,
        None => RaplogConfig::load(),
    };
    let interval_ms = interval_ms.unwrap_or(config.sampler.interval_ms);
    if interval_ms == 0 {
        anyhow::bail!("interval_ms must be positive");
    }

    if !nix::unistd::geteuid().is_root() {
        eprintln!(
            "{} energy counters are often readable by root only; expect missing records",
            "Note:".yellow()
        );
    }

    let sysfs = SysfsRoot::system();
    let resolved = domains::resolve(&sysfs, POWERCAP_BASE)
        .context("failed to enumerate RAPL power domains")?;
    eprintln!(
        "{} sampling {} domain(s) every {}ms",
        "raplog:".bold(),
        resolved.len(),
        interval_ms
    );

    let stdout = std::io::stdout();
    let mut csv = CsvWriter::new(stdout.lock());
    csv.header().context("failed to write CSV header")?;

    // The channel doubles as the shutdown primitive: normally nothing is
    // ever sent and the process runs until it is killed, but a write error
    // on the sink (e.g. a closed pipe) ends the loop at the next tick
    // boundary.
    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    Scheduler::new(Duration::from_millis(interval_ms)).run(&shutdown_rx, move || {
        let timestamp_ms = Utc::now().timestamp_millis();
        for record in sampler::sample_all(&sysfs, &resolved, timestamp_ms) {
            if csv.record(&record).is_err() {
                let _ = shutdown_tx.send(());
                return;
            }
        }
        let _ = csv.flush();
    });

    Ok(())
}

fn cmd_list(json: bool) -> Result<()> {
    let sysfs = SysfsRoot::system();
    let resolved = domains::resolve(&sysfs, POWERCAP_BASE)
        .context("failed to enumerate RAPL power domains")?;

    if json {
        output::print_domains_json(&resolved);
    } else {
        output::print_domains(&sysfs, &resolved);
    }

    Ok(())
}
