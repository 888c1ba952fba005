use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering or reading RAPL counters
#[derive(Debug, Error)]
pub enum RaplError {
	/// The processor is not an Intel family 6 part
	#[error("unsupported CPU: vendor {vendor}, family {family}")]
	UnsupportedCpu { vendor: String, family: u32 },

	/// More logical CPUs or packages than the configured bound
	#[error("discovery limit exceeded: more than {limit} {what}")]
	DiscoveryLimitExceeded { what: &'static str, limit: usize },

	/// Topology discovery found no logical CPU 0
	#[error("no CPU packages found")]
	NoPackages,

	/// The mandatory package domain of a package could not be read
	#[error("package {package}: could not open {}", path.display())]
	DomainDiscovery {
		package: u32,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A present domain could not be read at sample time
	#[error("package {package}: error reading {domain}")]
	CounterRead {
		package: u32,
		domain: String,
		#[source]
		source: io::Error,
	},

	#[error(transparent)]
	Io(#[from] io::Error),
}

impl RaplError {
	/// Formats the error followed by its chain of causes
	pub fn report(&self) -> String {
		let mut message = self.to_string();
		let mut cause = std::error::Error::source(self);
		while let Some(e) = cause {
			message.push_str(": ");
			message.push_str(&e.to_string());
			cause = e.source();
		}
		message
	}
}

pub type Result<T> = std::result::Result<T, RaplError>;
