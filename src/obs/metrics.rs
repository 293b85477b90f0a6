// self
use crate::obs::{Stage, StageOutcome};

/// Counts one stage outcome for `service` on the global metrics recorder (when enabled).
///
/// Every stage records exactly one `attempt` followed by one `success` or `failure`.
pub fn record_stage_outcome(stage: Stage, service: &str, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"keyring_connector_stage_total",
			"stage" => stage.as_str(),
			"service" => service.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, service, outcome);
	}
}
