use std::path::PathBuf;

use crate::constants::{CPUINFO_PATH, CPU_SYSFS_ROOT, MAX_CPUS, MAX_PACKAGES, POWERCAP_ROOT};

/// Locations and bounds used for one invocation
///
/// Every path points at a read-only kernel interface by default. Tests and
/// the CLI override them to read from another tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Directory holding the `cpuN/topology/physical_package_id` files
	pub cpu_root: PathBuf,

	/// Directory holding the `intel-rapl:N` powercap zones
	pub powercap_root: PathBuf,

	/// CPU descriptor file with `key : value` lines
	pub cpuinfo_path: PathBuf,

	/// Logical CPU enumeration stops at this index
	pub max_cpus: usize,

	/// Discovering more packages than this is an error
	pub max_packages: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			cpu_root: PathBuf::from(CPU_SYSFS_ROOT),
			powercap_root: PathBuf::from(POWERCAP_ROOT),
			cpuinfo_path: PathBuf::from(CPUINFO_PATH),
			max_cpus: MAX_CPUS,
			max_packages: MAX_PACKAGES,
		}
	}
}

impl Config {
	/// Returns true when every input path is the live kernel interface
	pub fn is_live_system(&self) -> bool {
		*self == Self {
			max_cpus: self.max_cpus,
			max_packages: self.max_packages,
			..Self::default()
		}
	}
}
