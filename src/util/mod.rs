pub mod cpu;
pub mod msr;

use std::path::Path;
use std::{fs, io};

use crate::constants::{ENERGY_STATUS_MASK, MICROJOULES_PER_JOULE};

/// Converts a microjoule counter value to joules
pub fn microjoules_to_joules(energy_uj: u64) -> f64 {
	energy_uj as f64 / MICROJOULES_PER_JOULE as f64
}

/// Converts a raw energy status register value to microjoules
///
/// # Arguments
///
/// * `ticks` - Raw energy status register value (low 32 bits are used)
/// * `energy_unit` - Energy status unit from MSR_RAPL_POWER_UNIT (power of 2)
pub const fn msr_ticks_to_uj(ticks: u64, energy_unit: u32) -> u64 {
	((ticks & ENERGY_STATUS_MASK) * MICROJOULES_PER_JOULE) >> energy_unit
}

/// Reads the first whitespace-separated token of a file
pub fn read_first_token(path: &Path) -> io::Result<String> {
	let content = fs::read_to_string(path)?;
	content
		.split_whitespace()
		.next()
		.map(str::to_owned)
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, format!("{} is empty", path.display())))
}

/// Reads a file holding a single unsigned integer
pub fn read_u64(path: &Path) -> io::Result<u64> {
	read_first_token(path)?
		.parse()
		.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
