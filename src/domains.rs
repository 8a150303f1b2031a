use crate::error::Result;
use crate::sysfs::SysfsRoot;
use serde::Serialize;

/// Default powercap base directory, relative to the sysfs root.
pub const POWERCAP_BASE: &str = "sys/class/powercap/intel-rapl";

/// Power zone directories look like `intel-rapl:0`, `intel-rapl:1`, ...
/// The trailing colon keeps control-type files like `enabled` out.
const DOMAIN_PREFIX: &str = "intel-rapl:";

/// One discovered RAPL power domain.
///
/// Resolved once at startup and immutable afterwards. The label behind
/// `name_path` is re-read on every sample; the counter paths are fixed, and
/// whether a domain has a DRAM sub-counter is decided here, never again.
#[derive(Debug, Clone, Serialize)]
pub struct RaplDomain {
    /// Directory name of the zone, e.g. `intel-rapl:0`.
    pub slug: String,
    /// Cumulative energy counter in microjoules (`energy_uj`).
    pub energy_path: String,
    /// Energy counter of the `<slug>:0` sub-zone, if the hardware has one.
    /// Package-only domains lack it and report the sentinel instead.
    pub dram_energy_path: Option<String>,
    /// Human-readable zone label (`name`), e.g. `package-0` or `dram`.
    pub name_path: String,
}

/// Enumerate the RAPL power domains under `base`.
///
/// A candidate becomes a domain only if both its energy counter and its name
/// label exist right now; candidates missing either are dropped without
/// comment, since powercap trees vary across hardware. An unlistable `base`
/// is fatal. An empty result is not.
pub fn resolve(sysfs: &SysfsRoot, base: &str) -> Result<Vec<RaplDomain>> {
    let mut domains = Vec::new();
    for entry in sysfs.list_dir(base)? {
        if !entry.starts_with(DOMAIN_PREFIX) {
            continue;
        }

        let energy_path = format!("{}/{}/energy_uj", base, entry);
        let name_path = format!("{}/{}/name", base, entry);
        if !sysfs.exists(&energy_path) || !sysfs.exists(&name_path) {
            continue;
        }

        let dram_path = format!("{}/{}/{}:0/energy_uj", base, entry, entry);
        let dram_energy_path = sysfs.exists(&dram_path).then_some(dram_path);

        domains.push(RaplDomain {
            slug: entry,
            energy_path,
            dram_energy_path,
            name_path,
        });
    }
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const BASE: &str = "sys/class/powercap/intel-rapl";

    fn write_zone(root: &Path, slug: &str, name: &str, energy: &str, dram: Option<&str>) {
        let dir = root.join(BASE).join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), name).unwrap();
        fs::write(dir.join("energy_uj"), energy).unwrap();
        if let Some(value) = dram {
            let sub = dir.join(format!("{}:0", slug));
            fs::create_dir_all(&sub).unwrap();
            fs::write(sub.join("energy_uj"), value).unwrap();
        }
    }

    #[test]
    fn test_missing_base_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());

        assert!(resolve(&sysfs, BASE).is_err());
    }

    #[test]
    fn test_empty_base_resolves_to_no_domains() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());
        fs::create_dir_all(tmp.path().join(BASE)).unwrap();

        assert!(resolve(&sysfs, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_non_matching_entries_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());
        fs::create_dir_all(tmp.path().join(BASE).join("some-other-zone")).unwrap();
        fs::write(tmp.path().join(BASE).join("enabled"), "1\n").unwrap();

        assert!(resolve(&sysfs, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_zone_without_required_files_is_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());
        // name file only, no energy counter
        let dir = tmp.path().join(BASE).join("intel-rapl:0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), "package-0\n").unwrap();
        write_zone(tmp.path(), "intel-rapl:1", "psys\n", "42\n", None);

        let domains = resolve(&sysfs, BASE).unwrap();
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].slug, "intel-rapl:1");
    }

    #[test]
    fn test_dram_sub_zone_is_optional() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());
        write_zone(tmp.path(), "intel-rapl:0", "package-0\n", "12345\n", None);
        write_zone(tmp.path(), "intel-rapl:1", "dram\n", "6789\n", Some("111\n"));

        let domains = resolve(&sysfs, BASE).unwrap();
        assert_eq!(domains.len(), 2);
        assert!(domains[0].dram_energy_path.is_none());
        assert_eq!(
            domains[1].dram_energy_path.as_deref(),
            Some("sys/class/powercap/intel-rapl/intel-rapl:1/intel-rapl:1:0/energy_uj")
        );
    }

    #[test]
    fn test_listing_order_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let sysfs = SysfsRoot::new(tmp.path());
        write_zone(tmp.path(), "intel-rapl:1", "dram\n", "1\n", None);
        write_zone(tmp.path(), "intel-rapl:0", "package-0\n", "0\n", None);

        let slugs: Vec<String> = resolve(&sysfs, BASE)
            .unwrap()
            .into_iter()
            .map(|d| d.slug)
            .collect();
        assert_eq!(slugs, vec!["intel-rapl:0", "intel-rapl:1"]);
    }
}
