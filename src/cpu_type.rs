use std::fs;
use std::path::Path;

use crate::constants::{INTEL_VENDOR_ID, SUPPORTED_CPU_FAMILY};
use crate::error::{RaplError, Result};

/// Vendor, family and model of the first CPU in a cpuinfo listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuInfo {
	pub vendor: String,
	pub family: u32,
	pub model: u32,
}

impl CpuInfo {
	/// Returns the microarchitecture name of a known RAPL-capable model
	pub fn microarchitecture(&self) -> Option<&'static str> {
		microarchitecture(self.model)
	}
}

/// Maps an Intel family 6 model number to its microarchitecture
///
/// Any Intel CPU from Sandybridge on has RAPL, so unknown models may still
/// work; they are only reported as unsupported.
pub fn microarchitecture(model: u32) -> Option<&'static str> {
	let name = match model {
		42 => "Sandybridge",
		45 => "Sandybridge-EP",
		58 => "Ivybridge",
		62 => "Ivybridge-EP",
		60 | 69 | 70 => "Haswell",
		63 => "Haswell-EP",
		61 | 71 => "Broadwell",
		79 => "Broadwell-EP",
		86 => "Broadwell-DE",
		78 | 94 => "Skylake",
		85 => "Skylake-X",
		142 | 158 => "Kaby Lake",
		165 | 166 => "Comet Lake",
		102 => "Cannon Lake",
		125 | 126 => "Ice Lake",
		106 | 108 => "Ice Lake-SP",
		140 | 141 => "Tiger Lake",
		151 | 154 => "Alder Lake",
		183 | 186 | 191 => "Raptor Lake",
		143 => "Sapphire Rapids",
		207 => "Emerald Rapids",
		87 => "Knight's Landing",
		133 => "Knight's Mill",
		55 | 74 | 76 | 90 | 92 | 95 | 122 => "Atom",
		_ => return None,
	};
	Some(name)
}

/// Returns the value of the first `key : value` line whose key is `key`
fn field<'a>(cpuinfo: &'a str, key: &str) -> Option<&'a str> {
	cpuinfo.lines().find_map(|line| {
		let (k, v) = line.split_once(':')?;
		(k.trim() == key).then(|| v.trim())
	})
}

fn numeric_field(cpuinfo: &str, key: &str) -> Result<u32> {
	let value = field(cpuinfo, key).ok_or_else(|| {
		std::io::Error::new(std::io::ErrorKind::InvalidData, format!("no \"{key}\" line in cpuinfo"))
	})?;
	value
		.parse()
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, format!("bad \"{key}\": {e}")).into())
}

/// Parses vendor, family and model out of cpuinfo text
///
/// Only the first occurrence of each field counts. Anything other than an
/// Intel family 6 part is `UnsupportedCpu`.
pub fn parse_cpuinfo(cpuinfo: &str) -> Result<CpuInfo> {
	let vendor = field(cpuinfo, "vendor_id").unwrap_or_default().to_owned();
	let family = numeric_field(cpuinfo, "cpu family").unwrap_or(0);

	if vendor != INTEL_VENDOR_ID || family != SUPPORTED_CPU_FAMILY {
		return Err(RaplError::UnsupportedCpu { vendor, family });
	}

	let model = numeric_field(cpuinfo, "model")?;
	Ok(CpuInfo { vendor, family, model })
}

/// Reads and parses the CPU descriptor file
pub fn identify_cpu(cpuinfo_path: &Path) -> Result<CpuInfo> {
	parse_cpuinfo(&fs::read_to_string(cpuinfo_path)?)
}
