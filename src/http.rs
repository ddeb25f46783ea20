//! Transport primitives for catalog discovery, method calls, and token exchanges.
//!
//! The module exposes [`HttpTransport`], the crate's only dependency on an HTTP stack, along with
//! [`HttpResponse`] and the URL [`Scheme`] selection used by the retry-without-TLS policy.
//! Transports only move bytes; the core decides what a non-2xx status means via
//! [`fetch_text`].

// self
use crate::{_prelude::*, error::TransportError};

/// Abstraction over blocking HTTP transports.
///
/// Implementations perform a single GET and report either the raw status + body or a
/// [`TransportError`] for network, DNS, TLS, or timeout failures. Non-2xx statuses are **not**
/// errors at this layer. Timeouts are a transport concern; the core passes the configured
/// per-call timeout on every request.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Issues a GET request for `url`, giving up after `timeout` when one is supplied.
	fn get(&self, url: &str, timeout: Option<Duration>) -> Result<HttpResponse, TransportError>;
}

/// Raw response returned by an [`HttpTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// URL scheme used for a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
	/// TLS-protected HTTP.
	#[default]
	Https,
	/// Plain HTTP.
	Http,
}
impl Scheme {
	/// Maps a "use SSL" toggle onto a scheme.
	pub const fn from_use_ssl(use_ssl: bool) -> Self {
		if use_ssl { Self::Https } else { Self::Http }
	}

	/// Returns the scheme label used in URLs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Https => "https",
			Self::Http => "http",
		}
	}

	/// Returns true for [`Scheme::Https`].
	pub const fn is_secure(self) -> bool {
		matches!(self, Self::Https)
	}
}
impl Display for Scheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Ordered list of schemes tried for token endpoint calls.
///
/// Installations without TLS support still answer over plain HTTP, so the default policy tries
/// `https` first and falls back to `http` once. Each scheme is attempted at most once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Scheme>", into = "Vec<Scheme>")]
pub struct SchemePolicy(Vec<Scheme>);
impl SchemePolicy {
	/// Builds a policy from the provided schemes, dropping repeats while keeping order.
	pub fn new<I>(schemes: I) -> Result<Self, crate::config::BrowserConfigError>
	where
		I: IntoIterator<Item = Scheme>,
	{
		let mut ordered = Vec::new();

		for scheme in schemes {
			if !ordered.contains(&scheme) {
				ordered.push(scheme);
			}
		}

		if ordered.is_empty() {
			return Err(crate::config::BrowserConfigError::EmptySchemePolicy);
		}

		Ok(Self(ordered))
	}

	/// Policy that never downgrades to plain HTTP.
	pub fn https_only() -> Self {
		Self(vec![Scheme::Https])
	}

	/// Policy that only speaks plain HTTP (developer installations).
	pub fn http_only() -> Self {
		Self(vec![Scheme::Http])
	}

	/// Schemes in attempt order.
	pub fn iter(&self) -> impl Iterator<Item = Scheme> + '_ {
		self.0.iter().copied()
	}

	/// Number of attempts the policy allows.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always false; policies hold at least one scheme.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Default for SchemePolicy {
	fn default() -> Self {
		Self(vec![Scheme::Https, Scheme::Http])
	}
}
impl TryFrom<Vec<Scheme>> for SchemePolicy {
	type Error = crate::config::BrowserConfigError;

	fn try_from(value: Vec<Scheme>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<SchemePolicy> for Vec<Scheme> {
	fn from(value: SchemePolicy) -> Self {
		value.0
	}
}

/// Issues a GET through `transport` and returns the body text of a 2xx response.
///
/// Non-2xx statuses become [`TransportError::Status`] carrying the response body.
pub fn fetch_text<T>(
	transport: &T,
	url: &str,
	timeout: Option<Duration>,
) -> Result<String, TransportError>
where
	T: ?Sized + HttpTransport,
{
	#[cfg(feature = "tracing")]
	tracing::debug!(url = %redact_signature(url), "Dispatching request.");

	let response = transport.get(url, timeout)?;
	let body = response.text();

	if !response.is_success() {
		#[cfg(feature = "tracing")]
		tracing::debug!(status = response.status, "Request failed with a non-2xx status.");

		return Err(TransportError::Status { url: url.to_owned(), status: response.status, body });
	}

	Ok(body)
}

/// Returns `url` with the `oauth_signature` value masked, for log output.
pub fn redact_signature(url: &str) -> String {
	const KEY: &str = "oauth_signature=";

	match url.find(KEY) {
		Some(start) => {
			let value_start = start + KEY.len();
			let value_end =
				url[value_start..].find('&').map(|idx| value_start + idx).unwrap_or(url.len());

			format!("{}<redacted>{}", &url[..value_start], &url[value_end..])
		},
		None => url.to_owned(),
	}
}

/// Blocking reqwest transport used by default.
///
/// Redirects follow reqwest's default policy; USOS API installations answer method calls
/// directly, so no special handling is needed.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub reqwest::blocking::Client);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport backed by a fresh blocking client.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		Ok(Self(reqwest::blocking::Client::builder().build()?))
	}

	/// Wraps an existing blocking client.
	pub fn with_client(client: reqwest::blocking::Client) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<reqwest::blocking::Client> for ReqwestTransport {
	fn as_ref(&self) -> &reqwest::blocking::Client {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn get(&self, url: &str, timeout: Option<Duration>) -> Result<HttpResponse, TransportError> {
		let mut request = self.0.get(url);

		if let Some(timeout) = timeout {
			request = request.timeout(timeout);
		}

		let response = request.send().map_err(|e| map_reqwest_error(url, e))?;
		let status = response.status().as_u16();
		let body = response.bytes().map_err(|e| map_reqwest_error(url, e))?;

		Ok(HttpResponse::new(status, body.to_vec()))
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(url: &str, err: reqwest::Error) -> TransportError {
	if err.is_timeout() {
		TransportError::timeout(url, err)
	} else {
		TransportError::network(url, err)
	}
}
