use msru::{Accessor, Msr};
use std::io;

use crate::constants::{ENERGY_UNIT_MASK, ENERGY_UNIT_OFFSET, INTEL_POWER_UNIT_MSR};

/// Reads a value from a Model-Specific Register (MSR)
///
/// # Arguments
///
/// * `msr_address` - The address of the MSR to read
/// * `cpu_id` - The logical CPU whose `/dev/cpu/N/msr` is read
pub fn read_msr(msr_address: u32, cpu_id: usize) -> io::Result<u64> {
	let cpu = u16::try_from(cpu_id).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
	Msr::new(msr_address, cpu)
		.map_err(io::Error::other)?
		.read()
		.map_err(io::Error::other)
}

/// Extracts the energy status unit from a MSR_RAPL_POWER_UNIT value
pub const fn energy_unit_from_power_unit(power_unit: u64) -> u32 {
	((power_unit & ENERGY_UNIT_MASK) >> ENERGY_UNIT_OFFSET) as u32
}

/// Reads the energy status unit of the package `cpu_id` belongs to
pub fn read_energy_unit(cpu_id: usize) -> io::Result<u32> {
	read_msr(INTEL_POWER_UNIT_MSR, cpu_id).map(energy_unit_from_power_unit)
}
