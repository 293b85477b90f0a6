// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{HttpMethod, TransportResponse, UnsupportedMethod},
	obs::Stage,
};

/// A span builder used by connector stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage + service.
	pub fn new(stage: Stage, service: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("keyring_connector.stage", stage = stage.as_str(), service);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, service);

			Self {}
		}
	}

	/// Enters the span for the rest of the synchronous stage.
	pub fn entered(self) -> StageSpanGuard {
		#[cfg(feature = "tracing")]
		{
			StageSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			StageSpanGuard {}
		}
	}
}

/// RAII guard returned by [`StageSpan::entered`].
pub struct StageSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for StageSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("StageSpanGuard(..)")
	}
}

pub(crate) fn debug_dispatch(method: HttpMethod, url: &Url) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(method = method.as_str(), url = url.as_str(), "dispatching request");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, url);
	}
}

// Header values are never logged; they carry the token.
pub(crate) fn debug_params(headers: &BTreeMap<String, String>, body: Option<&str>) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			headers = ?headers.keys().collect::<Vec<_>>(),
			body_len = body.map(str::len),
			"request parameters"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (headers, body);
	}
}

pub(crate) fn debug_response(outcome: &Result<TransportResponse, TransportError>) {
	#[cfg(feature = "tracing")]
	{
		match outcome {
			Ok(response) => tracing::debug!(
				status = response.status,
				headers = ?response.headers,
				body = %response.body,
				"raw response"
			),
			Err(e) => tracing::debug!(error = %e, "transport failure"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = outcome;
	}
}

pub(crate) fn warn_resolution_failure(service: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(service, error = %error, "credential resolution failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (service, error);
	}
}

pub(crate) fn error_unsupported_method(service: &str, error: &UnsupportedMethod) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(service, method = %error.method, "{error}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (service, error);
	}
}
