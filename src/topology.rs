use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{RaplError, Result};
use crate::util::read_u64;

/// A physical CPU package (socket)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Package {
	/// Physical package id reported by the kernel
	pub id: u32,

	/// First logical CPU observed in this package
	pub first_cpu: usize,
}

/// Logical CPU to package mapping discovered from sysfs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
	/// Distinct packages, ascending by id
	pub packages: Vec<Package>,

	/// Logical CPU id -> package id, for CPUs `0..total_cpus`
	pub cpu_packages: Vec<u32>,

	/// Number of contiguous logical CPUs found starting at 0
	pub total_cpus: usize,

	/// Enumeration stopped at the CPU bound while more CPUs existed
	pub truncated: bool,
}

impl Topology {
	/// Fails with `NoPackages` when discovery found nothing to sample
	pub fn require_packages(self) -> Result<Self> {
		if self.packages.is_empty() {
			return Err(RaplError::NoPackages);
		}
		Ok(self)
	}

	/// Looks up the package a logical CPU belongs to
	pub fn package_of(&self, cpu_id: usize) -> Option<u32> {
		self.cpu_packages.get(cpu_id).copied()
	}

	/// Package ids in discovery order
	pub fn package_ids(&self) -> impl Iterator<Item = u32> + '_ {
		self.packages.iter().map(|p| p.id)
	}
}

fn package_id_path(cpu_root: &Path, cpu_id: usize) -> PathBuf {
	cpu_root.join(format!("cpu{cpu_id}/topology/physical_package_id"))
}

/// Enumerates logical CPUs from 0 and maps each to its physical package
///
/// Enumeration is contiguous: it stops at the first CPU index without a
/// readable package id, or at `config.max_cpus`. Seeing more distinct
/// packages than `config.max_packages` is an error.
pub fn discover_topology(config: &Config) -> Result<Topology> {
	let mut packages: Vec<Package> = Vec::new();
	let mut cpu_packages = Vec::new();
	let mut truncated = false;

	for cpu_id in 0.. {
		if cpu_id >= config.max_cpus {
			truncated = package_id_path(&config.cpu_root, cpu_id).exists();
			if truncated {
				warn!(
					"Stopping CPU enumeration at the configured limit of {} logical CPUs",
					config.max_cpus
				);
			}
			break;
		}

		let path = package_id_path(&config.cpu_root, cpu_id);
		let package_id = match read_u64(&path).map(u32::try_from) {
			Ok(Ok(id)) => id,
			Ok(Err(_)) | Err(_) => {
				debug!("No package mapping at {}, {} logical CPUs found", path.display(), cpu_id);
				break;
			},
		};

		if !packages.iter().any(|p| p.id == package_id) {
			if packages.len() == config.max_packages {
				return Err(RaplError::DiscoveryLimitExceeded {
					what: "packages",
					limit: config.max_packages,
				});
			}
			debug!("CPU {} is the first in package {}", cpu_id, package_id);
			packages.push(Package {
				id: package_id,
				first_cpu: cpu_id,
			});
		}
		cpu_packages.push(package_id);
	}

	packages.sort_by_key(|p| p.id);

	Ok(Topology {
		total_cpus: cpu_packages.len(),
		packages,
		cpu_packages,
		truncated,
	})
}
