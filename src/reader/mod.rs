pub mod msr;
pub mod powercap;

use std::fmt::{self, Debug};

use tracing::debug;

use crate::catalog::Domain;
use crate::config::Config;
use crate::cpu_type::identify_cpu;
use crate::error::Result;
use crate::topology::Package;

/// Kernel interface the counters are read through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
	/// sysfs powercap zones (`/sys/class/powercap/intel-rapl`)
	Powercap,
	/// Raw energy status registers through `/dev/cpu/N/msr`
	Msr,
}

impl fmt::Display for Backend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Backend::Powercap => f.write_str("powercap"),
			Backend::Msr => f.write_str("msr"),
		}
	}
}

/// Discovers the energy domains a backend exposes for each package
pub trait EnergyReader: Debug {
	/// Returns the backend this reader uses
	fn backend(&self) -> Backend;

	/// Discovers every domain of a package
	///
	/// `zone` is the package's position in the sorted topology. The kernel
	/// numbers powercap zones by that position, not by physical package id,
	/// so the two differ when package ids have gaps.
	///
	/// Returns `NUM_RAPL_DOMAINS` entries in domain index order. Entry 0 is the
	/// package domain and is always present; a package without one is a
	/// `DomainDiscovery` error. Sub-domains the platform does not expose are
	/// returned with `present == false`.
	fn discover_domains(&self, zone: usize, package: &Package) -> Result<Vec<Domain>>;
}

/// Factory function to create the reader for the requested backend
///
/// The MSR reader needs the CPU model to scale the DRAM register, so the
/// cpuinfo file is read for that backend.
pub fn create_energy_reader(backend: Backend, config: &Config) -> Box<dyn EnergyReader> {
	use crate::reader::msr::MsrReader;
	use crate::reader::powercap::PowercapReader;

	match backend {
		Backend::Powercap => Box::new(PowercapReader::new(&config.powercap_root)),
		Backend::Msr => {
			let model = match identify_cpu(&config.cpuinfo_path) {
				Ok(cpu) => Some(cpu.model),
				Err(e) => {
					debug!("CPU model unknown, DRAM energy unit undetermined: {}", e.report());
					None
				},
			};
			Box::new(MsrReader::new(model))
		},
	}
}
