//! Fake sysfs trees for tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::Config;

/// A temporary directory laid out like the cpu and powercap sysfs trees
pub struct FakeSysfs {
	dir: TempDir,
}

impl FakeSysfs {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(dir.path().join("cpu")).unwrap();
		fs::create_dir_all(dir.path().join("powercap")).unwrap();
		Self { dir }
	}

	pub fn config(&self) -> Config {
		Config {
			cpu_root: self.dir.path().join("cpu"),
			powercap_root: self.dir.path().join("powercap"),
			cpuinfo_path: self.dir.path().join("cpuinfo"),
			..Config::default()
		}
	}

	/// Adds logical CPU `cpu` belonging to `package`
	pub fn cpu(&self, cpu: usize, package: u32) -> &Self {
		let topology = self.dir.path().join(format!("cpu/cpu{cpu}/topology"));
		fs::create_dir_all(&topology).unwrap();
		fs::write(topology.join("physical_package_id"), format!("{package}\n")).unwrap();
		self
	}

	/// Adds logical CPUs `0..count`, spread evenly over `packages`
	pub fn cpus(&self, count: usize, packages: u32) -> &Self {
		let per_package = count / packages as usize;
		for cpu in 0..count {
			self.cpu(cpu, (cpu / per_package) as u32);
		}
		self
	}

	/// Root zone directory for the package at zone index `zone`
	pub fn package_zone(&self, zone: u32) -> PathBuf {
		self.dir.path().join(format!("powercap/intel-rapl:{zone}"))
	}

	pub fn subdomain_zone(&self, zone: u32, sub: usize) -> PathBuf {
		self.package_zone(zone).join(format!("intel-rapl:{zone}:{sub}"))
	}

	/// Adds root zone `zone`
	pub fn package(&self, zone: u32, name: &str, energy_uj: u64) -> &Self {
		write_zone(&self.package_zone(zone), name, energy_uj);
		self
	}

	/// Adds sub-zone `sub` (0-based) under root zone `zone`
	pub fn subdomain(&self, zone: u32, sub: usize, name: &str, energy_uj: u64) -> &Self {
		write_zone(&self.subdomain_zone(zone, sub), name, energy_uj);
		self
	}

	pub fn cpuinfo(&self, content: &str) -> &Self {
		fs::write(self.dir.path().join("cpuinfo"), content).unwrap();
		self
	}
}

fn write_zone(zone: &Path, name: &str, energy_uj: u64) {
	fs::create_dir_all(zone).unwrap();
	fs::write(zone.join("name"), format!("{name}\n")).unwrap();
	fs::write(zone.join("energy_uj"), format!("{energy_uj}\n")).unwrap();
}

pub const INTEL_SKYLAKE_CPUINFO: &str = "\
processor	: 0
vendor_id	: GenuineIntel
cpu family	: 6
model		: 85
model name	: Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz
stepping	: 4

processor	: 1
vendor_id	: GenuineIntel
cpu family	: 6
model		: 85
model name	: Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz
stepping	: 4
";

pub const AMD_CPUINFO: &str = "\
processor	: 0
vendor_id	: AuthenticAMD
cpu family	: 25
model		: 33
model name	: AMD Ryzen 9 5950X 16-Core Processor
";
