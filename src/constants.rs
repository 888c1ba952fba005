// Default sysfs/procfs locations
pub const CPU_SYSFS_ROOT: &str = "/sys/devices/system/cpu";
pub const POWERCAP_ROOT: &str = "/sys/class/powercap/intel-rapl";
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

// Discovery bounds
pub const MAX_CPUS: usize = 1024;
pub const MAX_PACKAGES: usize = 16;

/// Package root plus four sub-domains
pub const NUM_RAPL_DOMAINS: usize = 5;

// Intel RAPL MSR addresses
pub const INTEL_POWER_UNIT_MSR: u32 = 0x606;
pub const INTEL_PKG_ENERGY_MSR: u32 = 0x611;
pub const INTEL_PP0_ENERGY_MSR: u32 = 0x639;
pub const INTEL_PP1_ENERGY_MSR: u32 = 0x641;
pub const INTEL_DRAM_ENERGY_MSR: u32 = 0x619;
pub const INTEL_PLATFORM_ENERGY_MSR: u32 = 0x64D;

// MSR_RAPL_POWER_UNIT layout
pub const ENERGY_UNIT_OFFSET: u64 = 0x08;
pub const ENERGY_UNIT_MASK: u64 = 0x1F00;

// Server parts count DRAM energy in fixed 2^-16 J units regardless of 0x606:
// Haswell-EP, Broadwell-EP/DE, Skylake-X, Ice Lake-SP, Sapphire/Emerald
// Rapids, Knight's Landing/Mill
pub const SERVER_DRAM_ENERGY_UNIT: u32 = 16;
pub const SERVER_DRAM_UNIT_MODELS: [u32; 10] = [63, 79, 86, 85, 106, 108, 143, 207, 87, 133];

// Energy status registers are 32 bits wide
pub const ENERGY_STATUS_MASK: u64 = 0xFFFF_FFFF;

pub const MICROJOULES_PER_JOULE: u64 = 1_000_000;

// CPU identification
pub const INTEL_VENDOR_ID: &str = "GenuineIntel";
pub const SUPPORTED_CPU_FAMILY: u32 = 6;
