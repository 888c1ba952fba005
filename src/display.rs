use std::fmt::Write as _;
use std::io::{self, Write};

use crate::catalog::Catalog;
use crate::cpu_type::CpuInfo;
use crate::energy::Sample;
use crate::topology::Topology;

/// Formats the CSV header for a catalog
///
/// Each package contributes a `p<id> time` column followed by one
/// `p<id> <name>` column per present domain.
pub fn format_header(catalog: &Catalog) -> String {
	let mut columns = Vec::with_capacity(catalog.column_count());
	for entry in catalog.packages() {
		let id = entry.package.id;
		columns.push(format!("p{id} time"));
		columns.extend(entry.present().map(|d| format!("p{id} {}", d.name)));
	}
	columns.join(",")
}

/// Formats a sample as one CSV row aligned with `format_header`
///
/// The sample timestamp fills every package's time column. Values are joules
/// with six decimals, `NaN` for domains that could not be read.
pub fn format_sample(catalog: &Catalog, sample: &Sample) -> String {
	debug_assert_eq!(sample.values.len(), catalog.value_count());

	let mut row = String::new();
	let mut values = sample.values.iter();
	for (n, entry) in catalog.packages().iter().enumerate() {
		if n > 0 {
			row.push(',');
		}
		let _ = write!(row, "{}", sample.timestamp_ms);
		for _ in entry.present() {
			let value = values.next().copied().unwrap_or(f64::NAN);
			let _ = write!(row, ",{value:.6}");
		}
	}
	row
}

/// Writes the logical CPU listing: `cpu (package)`, eight per line
pub fn write_topology_report(out: &mut impl Write, topology: &Topology) -> io::Result<()> {
	write!(out, "\t")?;
	for (cpu, package) in topology.cpu_packages.iter().enumerate() {
		write!(out, "{cpu} ({package})")?;
		if cpu % 8 == 7 {
			write!(out, "\n\t")?;
		} else {
			write!(out, ", ")?;
		}
	}
	writeln!(out)?;
	writeln!(
		out,
		"\tDetected {} cores in {} packages\n",
		topology.total_cpus,
		topology.packages.len()
	)
}

/// Writes the processor generation line of the info report
pub fn write_cpu_report(out: &mut impl Write, cpu: &CpuInfo) -> io::Result<()> {
	match cpu.microarchitecture() {
		Some(name) => writeln!(out, "Found {name} Processor type"),
		None => writeln!(out, "Found Unsupported model {} Processor type", cpu.model),
	}
}

/// Writes the remediation hints shown when counters cannot be read
pub fn write_failure_hint(out: &mut impl Write, running_as_root: bool) -> io::Result<()> {
	writeln!(out, "Unable to read RAPL counters.")?;
	writeln!(out, "* Verify you have an Intel Sandybridge or newer processor")?;
	writeln!(
		out,
		"* You may need to run as root or have /proc/sys/kernel/perf_event_paranoid set properly"
	)?;
	writeln!(out, "* If using raw msr access, make sure msr module is installed")?;
	if !running_as_root {
		writeln!(out, "* Currently running without root privileges")?;
	}
	writeln!(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::build_catalog;
	use crate::energy::sample;
	use crate::fixtures::FakeSysfs;
	use crate::reader::powercap::PowercapReader;
	use crate::topology::discover_topology;

	fn catalog_for(fake: &FakeSysfs) -> (Topology, Catalog) {
		let config = fake.config();
		let topology = discover_topology(&config).unwrap();
		let catalog = build_catalog(&topology, &PowercapReader::new(&config.powercap_root)).unwrap();
		(topology, catalog)
	}

	#[test]
	fn two_socket_header_and_row() {
		let fake = FakeSysfs::new();
		fake.cpus(4, 2);
		fake.package(0, "energy-pkg", 1_000_000).package(1, "energy-pkg", 2_500_000);
		let (_, catalog) = catalog_for(&fake);

		assert_eq!(format_header(&catalog), "p0 time,p0 energy-pkg,p1 time,p1 energy-pkg");

		let sample = sample(&catalog);
		let ts = sample.timestamp_ms;
		assert_eq!(format_sample(&catalog, &sample), format!("{ts},1.000000,{ts},2.500000"));
	}

	#[test]
	fn header_and_row_have_the_same_width() {
		let fake = FakeSysfs::new();
		fake.cpus(6, 3);
		fake.package(0, "package-0", 1)
			.subdomain(0, 0, "core", 2)
			.subdomain(0, 1, "uncore", 3)
			.package(1, "package-1", 4)
			.subdomain(1, 2, "dram", 5)
			.package(2, "package-2", 6)
			.subdomain(2, 0, "core", 7)
			.subdomain(2, 1, "uncore", 8)
			.subdomain(2, 2, "dram", 9)
			.subdomain(2, 3, "psys", 10);
		let (_, catalog) = catalog_for(&fake);

		let header = format_header(&catalog);
		let row = format_sample(&catalog, &sample(&catalog));
		assert_eq!(header.split(',').count(), catalog.column_count());
		assert_eq!(row.split(',').count(), catalog.column_count());
		assert_eq!(
			header,
			"p0 time,p0 package-0,p0 core,p0 uncore,\
			 p1 time,p1 package-1,p1 dram,\
			 p2 time,p2 package-2,p2 core,p2 uncore,p2 dram,p2 psys"
		);
	}

	#[test]
	fn failed_domain_prints_nan() {
		let fake = FakeSysfs::new();
		fake.cpus(1, 1);
		fake.package(0, "package-0", 1_500_000).subdomain(0, 0, "core", 1);
		let (_, catalog) = catalog_for(&fake);
		std::fs::write(fake.subdomain_zone(0, 0).join("energy_uj"), "garbage").unwrap();

		let sample = sample(&catalog);
		let row = format_sample(&catalog, &sample);
		assert_eq!(row, format!("{},1.500000,NaN", sample.timestamp_ms));
	}

	#[test]
	fn topology_report_lists_eight_cpus_per_line() {
		let fake = FakeSysfs::new();
		fake.cpus(10, 2);
		let topology = discover_topology(&fake.config()).unwrap();

		let mut out = Vec::new();
		write_topology_report(&mut out, &topology).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert_eq!(
			text,
			"\t0 (0), 1 (0), 2 (0), 3 (0), 4 (0), 5 (1), 6 (1), 7 (1)\n\
			 \t8 (1), 9 (1), \n\
			 \tDetected 10 cores in 2 packages\n\n"
		);
	}

	#[test]
	fn cpu_report_names_the_generation() {
		let mut out = Vec::new();
		let cpu = CpuInfo {
			vendor: "GenuineIntel".into(),
			family: 6,
			model: 63,
		};
		write_cpu_report(&mut out, &cpu).unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "Found Haswell-EP Processor type\n");

		let mut out = Vec::new();
		write_cpu_report(&mut out, &CpuInfo { model: 3, ..cpu }).unwrap();
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"Found Unsupported model 3 Processor type\n"
		);
	}

	#[test]
	fn failure_hint_mentions_root_only_when_needed() {
		let mut out = Vec::new();
		write_failure_hint(&mut out, true).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert!(text.starts_with("Unable to read RAPL counters.\n"));
		assert!(!text.contains("without root"));

		let mut out = Vec::new();
		write_failure_hint(&mut out, false).unwrap();
		assert!(String::from_utf8(out).unwrap().contains("without root"));
	}
}
