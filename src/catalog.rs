use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::Result;
use crate::reader::{Backend, EnergyReader};
use crate::topology::{Package, Topology};
use crate::util::msr::read_msr;
use crate::util::{msr_ticks_to_uj, read_u64};

/// Where the value of one energy domain is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterSource {
	/// An `energy_uj` file holding microjoules
	Sysfs(PathBuf),

	/// An energy status register scaled by 2^-energy_unit J per tick
	Msr { cpu: usize, register: u32, energy_unit: u32 },
}

impl CounterSource {
	/// Reads the current counter value in microjoules
	pub fn read_energy_uj(&self) -> io::Result<u64> {
		match self {
			CounterSource::Sysfs(path) => read_u64(path),
			CounterSource::Msr {
				cpu,
				register,
				energy_unit,
			} => read_msr(*register, *cpu).map(|ticks| msr_ticks_to_uj(ticks, *energy_unit)),
		}
	}
}

/// One energy accounting domain of a package
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
	/// 0 for the package domain, 1.. for sub-domains
	pub index: usize,

	/// Name reported by the platform, used in the CSV header
	pub name: String,

	pub source: CounterSource,

	/// Whether the platform exposes this domain
	pub present: bool,
}

/// A package and its domains in index order
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDomains {
	pub package: Package,
	pub domains: Vec<Domain>,
}

impl PackageDomains {
	/// Domains that contribute a column, in index order
	pub fn present(&self) -> impl Iterator<Item = &Domain> {
		self.domains.iter().filter(|d| d.present)
	}
}

/// Every package and domain discovered for one invocation
///
/// Packages are ordered by id, domains by index. The header and the sample
/// row are both produced by walking this value, so their columns always line
/// up.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
	backend: Backend,
	packages: Vec<PackageDomains>,
}

impl Catalog {
	pub fn backend(&self) -> Backend {
		self.backend
	}

	pub fn packages(&self) -> &[PackageDomains] {
		&self.packages
	}

	/// Present domains across all packages, in column order
	pub fn present_domains(&self) -> impl Iterator<Item = (&Package, &Domain)> {
		self.packages
			.iter()
			.flat_map(|p| p.present().map(move |d| (&p.package, d)))
	}

	/// Number of energy value columns
	pub fn value_count(&self) -> usize {
		self.present_domains().count()
	}

	/// Number of CSV columns, including one time column per package
	pub fn column_count(&self) -> usize {
		self.packages.len() + self.value_count()
	}
}

/// Discovers every package of the topology through `reader`
///
/// Packages are handed to the reader with their position in the sorted
/// topology, which is the index the kernel gives their powercap zone. Fails without a partial catalog as soon as one package lacks its package
/// domain.
pub fn build_catalog(topology: &Topology, reader: &dyn EnergyReader) -> Result<Catalog> {
	let mut packages = Vec::with_capacity(topology.packages.len());

	for (zone, package) in topology.packages.iter().enumerate() {
		let domains = reader.discover_domains(zone, package)?;
		debug!(
			"Package {}: {}",
			package.id,
			domains
				.iter()
				.filter(|d| d.present)
				.map(|d| d.name.as_str())
				.collect::<Vec<_>>()
				.join(", ")
		);
		packages.push(PackageDomains {
			package: *package,
			domains,
		});
	}

	let catalog = Catalog {
		backend: reader.backend(),
		packages,
	};
	info!(
		"Found {} energy domains in {} packages via {}",
		catalog.value_count(),
		catalog.packages.len(),
		catalog.backend
	);
	Ok(catalog)
}
