pub mod catalog;
pub mod config;
pub mod constants;
pub mod cpu_type;
pub mod display;
pub mod energy;
pub mod error;
pub mod reader;
pub mod topology;
pub mod util;

#[cfg(test)]
mod fixtures;

use std::io::{self, Write};

use tracing::{info, warn};

use crate::catalog::{Catalog, build_catalog};
use crate::config::Config;
use crate::cpu_type::identify_cpu;
use crate::display::{format_header, format_sample, write_cpu_report, write_topology_report};
use crate::energy::Sample;
use crate::error::{RaplError, Result};
use crate::reader::{Backend, create_energy_reader};
use crate::topology::{Topology, discover_topology};

/// Discovers the topology and every energy domain of every package
///
/// This is the main entry point: the returned catalog is what both the
/// header and the sample row are produced from.
pub fn load_catalog(config: &Config, backend: Backend) -> Result<(Topology, Catalog)> {
	let topology = discover_topology(config)?.require_packages()?;
	info!(
		"Detected {} cores in {} packages",
		topology.total_cpus,
		topology.packages.len()
	);

	let reader = create_energy_reader(backend, config);
	let catalog = build_catalog(&topology, reader.as_ref())?;
	Ok((topology, catalog))
}

/// Writes the CSV header line of a catalog
pub fn write_header(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
	writeln!(out, "{}", format_header(catalog))
}

/// Samples a catalog once and writes the CSV row
pub fn write_sample(out: &mut impl Write, catalog: &Catalog) -> io::Result<Sample> {
	let sample = energy::sample(catalog);
	writeln!(out, "{}", format_sample(catalog, &sample))?;
	if !sample.is_complete() {
		warn!(
			"{} of {} energy domains could not be read",
			sample.errors.len(),
			sample.values.len()
		);
	}
	Ok(sample)
}

/// Writes the processor and topology report
///
/// An unsupported processor is reported but does not stop the topology
/// listing.
pub fn write_info_report(out: &mut impl Write, config: &Config) -> Result<Topology> {
	match identify_cpu(&config.cpuinfo_path) {
		Ok(cpu) => write_cpu_report(out, &cpu)?,
		Err(RaplError::UnsupportedCpu { vendor, family }) => {
			if vendor != constants::INTEL_VENDOR_ID {
				writeln!(out, "{vendor} not an Intel chip")?;
			} else {
				writeln!(out, "Wrong CPU family {family}")?;
			}
		},
		Err(e) => warn!("Could not identify CPU: {}", e),
	}

	let topology = discover_topology(config)?;
	write_topology_report(out, &topology)?;

	if config.is_live_system() {
		let online = num_cpus::get();
		if online > topology.total_cpus {
			warn!(
				"{} logical CPUs are online but only {} were enumerated; CPU numbering has a gap",
				online, topology.total_cpus
			);
		}
	}

	Ok(topology)
}
