use crate::domains::RaplDomain;
use crate::sysfs::SysfsRoot;

/// Value written in the DRAM column when a domain has no DRAM sub-counter,
/// or when reading it fails. Distinct from "the counter read zero".
pub const DRAM_SENTINEL: &str = "-1";

/// Label substituted when a domain's name file cannot be read.
pub const UNKNOWN_LABEL: &str = "unknown";

/// One row of output: the counters of one domain at one instant.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Capture time in epoch milliseconds, shared by every record of a tick.
    pub timestamp_ms: i64,
    /// Label read from the domain's name file at sample time.
    pub domain: String,
    /// Primary energy counter, microjoules as text.
    pub energy_uj: String,
    /// DRAM energy counter, microjoules as text, or [`DRAM_SENTINEL`].
    pub dram_energy_uj: String,
}

/// Sample every resolved domain once, in descriptor order.
///
/// Domains whose primary counter is unreadable drop out of this tick and are
/// retried on the next one; the rest of the tick is unaffected.
pub fn sample_all(sysfs: &SysfsRoot, domains: &[RaplDomain], timestamp_ms: i64) -> Vec<Sample> {
    domains
        .iter()
        .filter_map(|domain| sample_domain(sysfs, domain, timestamp_ms))
        .collect()
}

/// Read one domain's counters.
///
/// The label is best-effort and falls back to [`UNKNOWN_LABEL`]. The DRAM
/// counter is best-effort and falls back to [`DRAM_SENTINEL`]; a domain
/// resolved without a DRAM path gets the sentinel without any read attempt.
/// Only the primary counter is load-bearing: if it cannot be read there is
/// no usable sample and the domain emits nothing this tick.
pub fn sample_domain(sysfs: &SysfsRoot, domain: &RaplDomain, timestamp_ms: i64) -> Option<Sample> {
    let label = sysfs
        .read(&domain.name_path)
        .unwrap_or_else(|_| UNKNOWN_LABEL.to_string());

    let energy_uj = sysfs.read(&domain.energy_path).ok()?;

    let dram_energy_uj = match &domain.dram_energy_path {
        Some(path) => sysfs
            .read(path)
            .unwrap_or_else(|_| DRAM_SENTINEL.to_string()),
        None => DRAM_SENTINEL.to_string(),
    };

    Some(Sample {
        timestamp_ms,
        domain: label,
        energy_uj,
        dram_energy_uj,
    })
}
