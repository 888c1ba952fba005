use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use tracing::{Level, debug, error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use rapl_reader::config::Config;
use rapl_reader::constants::{CPU_SYSFS_ROOT, CPUINFO_PATH, MAX_CPUS, MAX_PACKAGES, POWERCAP_ROOT};
use rapl_reader::display::write_failure_hint;
use rapl_reader::error::{RaplError, Result};
use rapl_reader::reader::Backend;
use rapl_reader::topology::Topology;
use rapl_reader::util::cpu::{is_root, pin_current_thread};
use rapl_reader::{load_catalog, write_header, write_info_report, write_sample};

/// Read the Intel RAPL energy counters once and print them as CSV.
#[derive(Parser)]
#[command(name = "rapl-read", version, about)]
#[command(group(ArgGroup::new("mode").args(["sysfs", "info", "variables", "table"])))]
struct Args {
	/// Logical CPU to run the reads on.
	#[arg(short, long, default_value_t = 0)]
	core: usize,

	/// Print one sample row (the default).
	#[arg(short, long)]
	sysfs: bool,

	/// Show CPU and topology information.
	#[arg(short, long)]
	info: bool,

	/// Show the available counters as a CSV header.
	#[arg(short, long)]
	variables: bool,

	/// Print the CSV header followed by one sample row.
	#[arg(short, long)]
	table: bool,

	/// Read the energy status MSRs instead of the powercap interface.
	#[arg(short, long)]
	msr: bool,

	/// Directory holding cpuN/topology.
	#[arg(long, value_name = "PATH", default_value = CPU_SYSFS_ROOT)]
	cpu_root: PathBuf,

	/// Directory holding the intel-rapl:N powercap zones.
	#[arg(long, value_name = "PATH", default_value = POWERCAP_ROOT)]
	powercap_root: PathBuf,

	/// CPU descriptor file.
	#[arg(long, value_name = "PATH", default_value = CPUINFO_PATH)]
	cpuinfo: PathBuf,

	/// Stop CPU enumeration after this many logical CPUs.
	#[arg(long, default_value_t = MAX_CPUS)]
	max_cpus: usize,

	/// Fail when more packages than this are found.
	#[arg(long, default_value_t = MAX_PACKAGES)]
	max_packages: usize,

	/// Increase diagnostic verbosity (-d for debug, -dd for trace).
	#[arg(short, long, action = clap::ArgAction::Count)]
	debug: u8,

	/// Only report errors on stderr.
	#[arg(short, long)]
	quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
	Sample,
	Info,
	Variables,
	Table,
}

impl Args {
	fn mode(&self) -> Mode {
		if self.info {
			Mode::Info
		} else if self.variables {
			Mode::Variables
		} else if self.table {
			Mode::Table
		} else {
			Mode::Sample
		}
	}

	fn config(&self) -> Config {
		Config {
			cpu_root: self.cpu_root.clone(),
			powercap_root: self.powercap_root.clone(),
			cpuinfo_path: self.cpuinfo.clone(),
			max_cpus: self.max_cpus,
			max_packages: self.max_packages,
		}
	}

	fn backend(&self) -> Backend {
		if self.msr { Backend::Msr } else { Backend::Powercap }
	}
}

/// Diagnostics go to stderr so stdout stays plain CSV.
fn init_logging(debug: u8, quiet: bool) {
	let level = if quiet {
		Level::ERROR
	} else {
		match debug {
			0 => Level::WARN,
			1 => Level::DEBUG,
			_ => Level::TRACE,
		}
	};

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(level).into()));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(io::stderr)
		.init();
}

fn pin_to_core(core: usize, topology: &Topology) {
	match topology.package_of(core) {
		Some(package) => match pin_current_thread(core) {
			Ok(()) => debug!("Reading from CPU {} (package {})", core, package),
			Err(e) => warn!("Failed to set thread affinity to CPU {}: {}", core, e),
		},
		None => warn!(
			"CPU {} does not exist ({} logical CPUs), not pinning",
			core, topology.total_cpus
		),
	}
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
	let config = args.config();
	let mode = args.mode();

	// The info report never fails the run, whatever discovery finds
	if mode == Mode::Info {
		if let Err(e) = write_info_report(out, &config) {
			warn!("CPU report incomplete: {}", e.report());
		}
		out.flush()?;
		return Ok(());
	}

	let (topology, catalog) = load_catalog(&config, args.backend())?;

	if matches!(mode, Mode::Variables | Mode::Table) {
		write_header(out, &catalog)?;
	}
	if matches!(mode, Mode::Sample | Mode::Table) {
		pin_to_core(args.core, &topology);
		write_sample(out, &catalog)?;
	}
	out.flush()?;
	Ok(())
}

/// Logs `error` and prints the remediation checklist
fn report_failure(out: &mut impl Write, error: &RaplError, running_as_root: bool) {
	error!("{}", error.report());
	if let Err(e) = write_failure_hint(out, running_as_root) {
		warn!("Could not write the failure hint: {}", e);
	}
}

fn main() -> ExitCode {
	let args = Args::parse();
	init_logging(args.debug, args.quiet);

	let stdout = io::stdout();
	let mut out = stdout.lock();

	match run(&args, &mut out) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			report_failure(&mut out, &e, is_root());
			ExitCode::FAILURE
		},
	}
}
