use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::{CounterSource, Domain};
use crate::constants::NUM_RAPL_DOMAINS;
use crate::error::{RaplError, Result};
use crate::reader::{Backend, EnergyReader};
use crate::topology::Package;
use crate::util::read_first_token;

/// Reads RAPL zones from the sysfs powercap interface
///
/// Layout under the root, for the package at zone index `Z`:
///
/// ```text
/// intel-rapl:Z/name                      package domain name
/// intel-rapl:Z/energy_uj                 package counter (microjoules)
/// intel-rapl:Z/intel-rapl:Z:K/name       sub-domain K name (optional)
/// intel-rapl:Z/intel-rapl:Z:K/energy_uj  sub-domain K counter
/// ```
#[derive(Debug, Clone)]
pub struct PowercapReader {
	root: PathBuf,
}

impl PowercapReader {
	pub fn new(root: impl AsRef<Path>) -> Self {
		Self {
			root: root.as_ref().to_path_buf(),
		}
	}

	fn package_zone(&self, zone: usize) -> PathBuf {
		self.root.join(format!("intel-rapl:{zone}"))
	}
}

impl EnergyReader for PowercapReader {
	fn backend(&self) -> Backend {
		Backend::Powercap
	}

	fn discover_domains(&self, zone: usize, package: &Package) -> Result<Vec<Domain>> {
		let zone_dir = self.package_zone(zone);
		let name_path = zone_dir.join("name");

		let name = read_first_token(&name_path).map_err(|source| RaplError::DomainDiscovery {
			package: package.id,
			path: name_path,
			source,
		})?;

		let mut domains = Vec::with_capacity(NUM_RAPL_DOMAINS);
		domains.push(Domain {
			index: 0,
			name,
			source: CounterSource::Sysfs(zone_dir.join("energy_uj")),
			present: true,
		});

		for index in 1..NUM_RAPL_DOMAINS {
			let zone_name = format!("intel-rapl:{}:{}", zone, index - 1);
			let sub_zone = zone_dir.join(&zone_name);
			let source = CounterSource::Sysfs(sub_zone.join("energy_uj"));

			let domain = match read_first_token(&sub_zone.join("name")) {
				Ok(name) => Domain {
					index,
					name,
					source,
					present: true,
				},
				Err(e) => {
					debug!("Package {} has no {}: {}", package.id, zone_name, e);
					Domain {
						index,
						name: zone_name,
						source,
						present: false,
					}
				},
			};
			domains.push(domain);
		}

		Ok(domains)
	}
}
