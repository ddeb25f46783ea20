//! Crate-level error types shared by the signer, the catalog client, and the flows.

// self
use crate::{_prelude::*, config::BrowserConfigError, flows::FlowState};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used to carry transport- or host-specific failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or precondition problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure or non-2xx response.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Catalog payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Well-formed response missing the expected OAuth fields.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),

	/// Method is not listed by the current installation.
	#[error("Method `{name}` is not listed by the current installation.")]
	UnknownMethod {
		/// Requested method name.
		name: String,
	},
}

/// Configuration and precondition failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Installation base URL cannot be parsed.
	#[error("Installation base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending base URL.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Installation base URL uses a scheme other than http or https.
	#[error("Installation base URL `{url}` must use http or https.")]
	UnsupportedScheme {
		/// Offending base URL.
		url: String,
	},
	/// Browser configuration failed validation.
	#[error(transparent)]
	InvalidConfig(#[from] BrowserConfigError),

	/// A token was supplied for signing without a consumer key.
	#[error("Signing with a token requires signing with a consumer key as well.")]
	TokenWithoutConsumer,
	/// Token acquisition was attempted without a consumer key.
	#[error("A consumer key is required to acquire tokens.")]
	MissingConsumerKey,
	/// Token acquisition operation called out of order.
	#[error("Cannot {operation} while token acquisition is in the {actual} state.")]
	InvalidFlowState {
		/// Operation that was rejected.
		operation: &'static str,
		/// State the flow was in.
		actual: FlowState,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, DNS, TLS, timeouts, non-2xx statuses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while requesting {url}.")]
	Network {
		/// Requested URL.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request did not complete within the configured timeout.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Requested URL.
		url: String,
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Server answered with a non-2xx status.
	#[error("Server answered {url} with HTTP {status}.")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
		/// Response body, kept for diagnosis.
		body: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { url: url.into(), source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(url: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { url: url.into(), source: Box::new(src) }
	}

	/// URL of the failed request.
	pub fn url(&self) -> &str {
		match self {
			Self::Network { url, .. } | Self::Timeout { url, .. } | Self::Status { url, .. } => url,
		}
	}

	/// HTTP status code, when the server answered.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Response body, when the server answered.
	pub fn body(&self) -> Option<&str> {
		match self {
			Self::Status { body, .. } => Some(body),
			_ => None,
		}
	}
}

/// Catalog payload that is not well-formed JSON of the expected shape.
#[derive(Debug, ThisError)]
#[error("The {resource} payload is malformed at `{}`.", .source.path())]
pub struct DecodeError {
	/// Catalog resource being decoded.
	pub resource: &'static str,
	/// Structured parsing failure including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}
impl DecodeError {
	/// JSON path at which decoding failed.
	pub fn path(&self) -> String {
		self.source.path().to_string()
	}
}

/// Well-formed response that lacks fields the OAuth exchange requires.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Token endpoint response omitted a required key.
	#[error("The {endpoint} response is missing `{field}`.")]
	MissingField {
		/// Token endpoint label.
		endpoint: &'static str,
		/// Missing key.
		field: &'static str,
		/// Raw response body.
		body: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_errors_expose_status_and_body() {
		let err = TransportError::Status {
			url: "https://usos.example.edu/services/oauth/request_token".into(),
			status: 401,
			body: "Invalid consumer.".into(),
		};

		assert_eq!(err.status(), Some(401));
		assert_eq!(err.body(), Some("Invalid consumer."));
		assert!(err.to_string().contains("HTTP 401"));

		let wrapped: Error = err.into();

		assert!(matches!(wrapped, Error::Transport(TransportError::Status { status: 401, .. })));
	}

	#[test]
	fn network_errors_keep_their_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let err = TransportError::network("http://localhost/", io);

		assert_eq!(err.status(), None);
		assert_eq!(err.body(), None);
		assert_eq!(err.url(), "http://localhost/");
		assert!(err.source().is_some());
	}
}
