// self
use crate::obs::{FlowKind, FlowOutcome};

/// Bumps `usos_api_browser_flow_total{flow, outcome}` on the installed `metrics` recorder.
///
/// Without the `metrics` feature, or without a recorder, this does nothing.
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"usos_api_browser_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_flow_outcome_noop_without_metrics() {
		record_flow_outcome(FlowKind::MethodCall, FlowOutcome::Failure);
	}

	#[test]
	fn outcome_follows_result() {
		assert_eq!(FlowOutcome::of(&Ok::<_, ()>(1)), FlowOutcome::Success);
		assert_eq!(FlowOutcome::of(&Err::<(), _>("boom")), FlowOutcome::Failure);
	}
}
