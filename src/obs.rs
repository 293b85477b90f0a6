//! Optional observability helpers for connector stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `keyring_connector.stage` with the `stage`
//!   and `service` fields, plus debug lines for every dispatched request.
//! - Enable `metrics` to increment the `keyring_connector_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage`, `service` and `outcome`.
//!
//! Independently of both features, every connector keeps in-process [`ConnectorMetrics`].

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::_prelude::*;

/// Connector stages observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Local redirect to the verification endpoint.
	RequestToken,
	/// Token minting and persistence.
	VerifyToken,
	/// Outbound API request.
	Request,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::RequestToken => "request_token",
			Stage::VerifyToken => "verify_token",
			Stage::Request => "request",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a connector stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Thread-safe outcome counters for one stage.
#[derive(Debug, Default)]
pub struct StageCounters {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
}
impl StageCounters {
	/// Number of times the stage was entered.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Number of successful completions.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Number of failures returned to the caller.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	fn record(&self, outcome: StageOutcome) {
		let counter = match outcome {
			StageOutcome::Attempt => &self.attempts,
			StageOutcome::Success => &self.successes,
			StageOutcome::Failure => &self.failures,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

/// Per-connector counters for every [`Stage`].
#[derive(Debug, Default)]
pub struct ConnectorMetrics {
	request_token: StageCounters,
	verify_token: StageCounters,
	request: StageCounters,
}
impl ConnectorMetrics {
	/// Counters for `stage`.
	pub fn stage(&self, stage: Stage) -> &StageCounters {
		match stage {
			Stage::RequestToken => &self.request_token,
			Stage::VerifyToken => &self.verify_token,
			Stage::Request => &self.request,
		}
	}

	/// Records `outcome` locally and on the global recorder.
	pub(crate) fn record(&self, stage: Stage, service: &str, outcome: StageOutcome) {
		self.stage(stage).record(outcome);

		record_stage_outcome(stage, service, outcome);
	}
}
