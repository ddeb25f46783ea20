//! Spans and counters around every network-bound operation of the browser.
//!
//! All of them share one span name (`usos_api_browser.flow`) and one counter
//! (`usos_api_browser_flow_total`), told apart by [`FlowKind`]. A scheme fallback inside a token
//! leg stays within that leg's span.
//!
//! Both halves are feature-gated (`tracing`, `metrics`) and cost nothing when disabled.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Which part of the browser issued a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Installation list, method index, method detail or scope list.
	Catalog,
	/// [`Session::execute`](crate::session::Session::execute).
	MethodCall,
	/// Request token leg of token acquisition.
	RequestToken,
	/// Access token leg of token acquisition.
	AccessToken,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Catalog => "catalog",
			FlowKind::MethodCall => "method_call",
			FlowKind::RequestToken => "request_token",
			FlowKind::AccessToken => "access_token",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Counter label; every operation records `Attempt` first, then exactly one of the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Operation started.
	Attempt,
	/// Result returned to the caller was `Ok`.
	Success,
	/// Result returned to the caller was `Err`, after any scheme fallback.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`FlowOutcome::Success`] or [`FlowOutcome::Failure`].
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
