use std::fs;
use std::path::Path;

use rapl_reader::config::Config;
use tempfile::TempDir;

/// Builds a cpu/powercap/cpuinfo tree under a temporary directory
pub struct Machine {
	pub dir: TempDir,
}

impl Machine {
	/// `packages` sockets with `cpus_per_package` logical CPUs each, numbered
	/// package by package
	pub fn new(packages: u32, cpus_per_package: usize) -> Self {
		let dir = tempfile::tempdir().unwrap();
		for package in 0..packages {
			for n in 0..cpus_per_package {
				let cpu = package as usize * cpus_per_package + n;
				let topology = dir.path().join(format!("cpu/cpu{cpu}/topology"));
				fs::create_dir_all(&topology).unwrap();
				fs::write(topology.join("physical_package_id"), format!("{package}\n")).unwrap();
			}
		}
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

	pub fn zone(&self, package: u32, sub: Option<usize>, name: &str, energy_uj: u64) -> &Self {
		let mut zone = self.dir.path().join(format!("powercap/intel-rapl:{package}"));
		if let Some(sub) = sub {
			zone = zone.join(format!("intel-rapl:{package}:{sub}"));
		}
		write_zone(&zone, name, energy_uj);
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
