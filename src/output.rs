use crate::domains::RaplDomain;
use crate::sampler::Sample;
use crate::sysfs::SysfsRoot;
use colored::Colorize;
use std::io::{self, Write};

/// CSV header, preserved byte-for-byte for existing downstream consumers.
pub const CSV_HEADER: &str = "Timestamp,Domain, Energy (micro joules), DRAM Energy (micro joules)";

const LABEL_W: usize = 16;

/// Line-oriented CSV sink. The sampler core hands it finished records;
/// durability, rotation and buffering beyond `flush` stay with the caller.
pub struct CsvWriter<W: Write> {
    out: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the one-time header line.
    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", CSV_HEADER)
    }

    /// Write one record line.
    pub fn record(&mut self, sample: &Sample) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{}",
            sample.timestamp_ms, sample.domain, sample.energy_uj, sample.dram_energy_uj
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Human-readable listing of the resolved domains.
pub fn print_domains(sysfs: &SysfsRoot, domains: &[RaplDomain]) {
    println!("{}", "RAPL Power Domains".bold().underline());

    if domains.is_empty() {
        println!(
            "  {} no power domains found under the powercap tree",
            "Note:".yellow()
        );
        return;
    }

    for domain in domains {
        let label = sysfs
            .read_optional(&domain.name_path)
            .unwrap_or(None)
            .unwrap_or_else(|| "?".to_string());
        let dram = if domain.dram_energy_path.is_some() {
            "yes".green()
        } else {
            "no".dimmed()
        };
        println!(
            "  {:<width$} {:<12} dram: {}",
            domain.slug.cyan(),
            label,
            dram,
            width = LABEL_W
        );
    }
}

/// JSON listing of the resolved domains.
pub fn print_domains_json(domains: &[RaplDomain]) {
    println!(
        "{}",
        serde_json::to_string_pretty(domains).expect("domain list serializes")
    );
}
