use std::path::PathBuf;

use tracing::debug;

use crate::catalog::{CounterSource, Domain};
use crate::constants::*;
use crate::error::{RaplError, Result};
use crate::reader::{Backend, EnergyReader};
use crate::topology::Package;
use crate::util::msr::{read_energy_unit, read_msr};

/// Energy status registers in domain index order, with their column names
pub const MSR_DOMAINS: [(&str, u32); NUM_RAPL_DOMAINS] = [
	("energy-pkg", INTEL_PKG_ENERGY_MSR),
	("energy-cores", INTEL_PP0_ENERGY_MSR),
	("energy-gpu", INTEL_PP1_ENERGY_MSR),
	("energy-ram", INTEL_DRAM_ENERGY_MSR),
	("energy-psys", INTEL_PLATFORM_ENERGY_MSR),
];

const DRAM_DOMAIN: usize = 3;

/// Reads RAPL energy status registers directly
///
/// Requires the `msr` kernel module and read access to `/dev/cpu/N/msr`.
/// Each package is read through its first logical CPU.
#[derive(Debug, Clone, Copy)]
pub struct MsrReader {
	/// Family 6 model number, `None` when the CPU could not be identified
	model: Option<u32>,
}

impl MsrReader {
	pub fn new(model: Option<u32>) -> Self {
		Self { model }
	}
}

/// Returns the energy unit of the DRAM status register
///
/// Client parts scale DRAM like the package. The server models in
/// `SERVER_DRAM_UNIT_MODELS` use a fixed unit. Without a model the unit is
/// unknown and `None` is returned.
pub fn dram_energy_unit(model: Option<u32>, package_unit: u32) -> Option<u32> {
	let model = model?;
	if SERVER_DRAM_UNIT_MODELS.contains(&model) {
		Some(SERVER_DRAM_ENERGY_UNIT)
	} else {
		Some(package_unit)
	}
}

fn msr_device(cpu_id: usize) -> PathBuf {
	PathBuf::from(format!("/dev/cpu/{cpu_id}/msr"))
}

impl EnergyReader for MsrReader {
	fn backend(&self) -> Backend {
		Backend::Msr
	}

	fn discover_domains(&self, _zone: usize, package: &Package) -> Result<Vec<Domain>> {
		let cpu = package.first_cpu;
		let discovery_error = |source| RaplError::DomainDiscovery {
			package: package.id,
			path: msr_device(cpu),
			source,
		};

		let energy_unit = read_energy_unit(cpu).map_err(discovery_error)?;
		debug!("Package {} energy unit: 2^-{} J", package.id, energy_unit);
		let dram_unit = dram_energy_unit(self.model, energy_unit);

		let mut domains = Vec::with_capacity(NUM_RAPL_DOMAINS);
		for (index, &(name, register)) in MSR_DOMAINS.iter().enumerate() {
			let unit = if index == DRAM_DOMAIN { dram_unit } else { Some(energy_unit) };
			let present = match (read_msr(register, cpu), unit) {
				(Ok(_), Some(_)) => true,
				(Ok(_), None) => {
					debug!("Package {}: {} unit unknown for an unidentified CPU", package.id, name);
					false
				},
				(Err(e), _) if index == 0 => return Err(discovery_error(e)),
				(Err(e), _) => {
					debug!("Package {} has no {} (MSR {:#x}): {}", package.id, name, register, e);
					false
				},
			};

			domains.push(Domain {
				index,
				name: name.to_owned(),
				source: CounterSource::Msr {
					cpu,
					register,
					energy_unit: unit.unwrap_or(energy_unit),
				},
				present,
			});
		}

		Ok(domains)
	}
}
