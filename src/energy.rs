use chrono::Utc;
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::RaplError;
use crate::util::microjoules_to_joules;

/// One reading of every present domain of a catalog
///
/// This structure captures a point-in-time energy reading, in joules, for
/// each present domain in catalog order.
#[derive(Debug)]
pub struct Sample {
	/// Milliseconds since the Unix epoch, taken once before any counter read
	pub timestamp_ms: i64,

	/// Energy in joules per present domain, NaN where the read failed
	pub values: Vec<f64>,

	/// Reads that failed, in catalog order
	pub errors: Vec<RaplError>,
}

impl Sample {
	/// True when every present domain was read
	pub fn is_complete(&self) -> bool {
		self.errors.is_empty()
	}
}

/// Reads every present domain of `catalog` once
///
/// A failed read is logged and recorded, and its column holds NaN so the row
/// stays aligned with the header.
pub fn sample(catalog: &Catalog) -> Sample {
	let timestamp_ms = Utc::now().timestamp_millis();
	let mut values = Vec::with_capacity(catalog.value_count());
	let mut errors = Vec::new();

	for (package, domain) in catalog.present_domains() {
		match domain.source.read_energy_uj() {
			Ok(energy_uj) => values.push(microjoules_to_joules(energy_uj)),
			Err(source) => {
				let error = RaplError::CounterRead {
					package: package.id,
					domain: domain.name.clone(),
					source,
				};
				warn!("{}", error.report());
				errors.push(error);
				values.push(f64::NAN);
			},
		}
	}

	Sample {
		timestamp_ms,
		values,
		errors,
	}
}
