//! Shared helpers for token endpoint calls (scope formatting, scheme fallback).

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenPair},
	catalog::Installation,
	config::{BrowserConfig, BrowserConfigError},
	error::{ConfigError, TransportError},
	http::{self, HttpTransport, Scheme},
	oauth::{self, Signer},
};

/// Delimiter between scope keys in the `scopes` parameter.
pub const SCOPE_DELIMITER: char = '|';

/// Joins scope keys with [`SCOPE_DELIMITER`], skipping empty keys.
///
/// Returns `None` when nothing remains so callers can omit the parameter.
pub fn format_scopes<I, S>(scopes: I) -> Option<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut buf = String::new();

	for scope in scopes {
		let scope = scope.as_ref();

		if scope.is_empty() {
			continue;
		}
		if !buf.is_empty() {
			buf.push(SCOPE_DELIMITER);
		}

		buf.push_str(scope);
	}

	if buf.is_empty() { None } else { Some(buf) }
}

/// Signed call against one of the OAuth token endpoints.
#[derive(Debug)]
pub(crate) struct TokenCall<'a> {
	/// Label used in errors and spans.
	pub(crate) endpoint: &'static str,
	/// Method path below the installation base URL.
	pub(crate) method_path: &'static str,
	/// Caller parameters signed along with the protocol parameters.
	pub(crate) params: BTreeMap<String, String>,
	/// Credentials the call is signed with.
	pub(crate) credentials: &'a Credentials,
}

/// Token pair returned by a [`TokenCall`] together with the scheme that answered.
#[derive(Debug)]
pub(crate) struct TokenCallOutcome {
	pub(crate) pair: TokenPair,
	pub(crate) scheme: Scheme,
}

/// Issues `call` over each scheme of the configured policy until one answers.
///
/// Every attempt is signed afresh. Only transport failures move on to the next scheme; a body
/// without the token fields fails immediately. When every scheme fails, the last transport error
/// is returned.
pub(crate) fn call_token_endpoint<T>(
	transport: &T,
	installation: &Installation,
	config: &BrowserConfig,
	call: &TokenCall<'_>,
) -> Result<TokenCallOutcome>
where
	T: ?Sized + HttpTransport,
{
	let signer = Signer::new(call.credentials);
	let mut last_error: Option<TransportError> = None;

	for scheme in config.scheme_policy.iter() {
		let url =
			signer.signed_url_with_scheme(installation, call.method_path, &call.params, scheme)?;

		match http::fetch_text(transport, &url, Some(config.timeout)) {
			Ok(body) => {
				let pair = oauth::parse_token_response(call.endpoint, &body)?;

				return Ok(TokenCallOutcome { pair, scheme });
			},
			Err(e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(
					endpoint = call.endpoint,
					scheme = %scheme,
					error = %e,
					"Token endpoint call failed."
				);

				last_error = Some(e);
			},
		}
	}

	match last_error {
		Some(e) => Err(e.into()),
		None => Err(ConfigError::from(BrowserConfigError::EmptySchemePolicy).into()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_are_pipe_joined() {
		assert_eq!(format_scopes(["studies", "email"]), Some("studies|email".into()));
		assert_eq!(format_scopes(["", "grades", ""]), Some("grades".into()));
		assert_eq!(format_scopes(Vec::<String>::new()), None);
	}
}
