//! OAuth 1.0a HMAC-SHA1 request signing.
//!
//! [`Signer`] turns an installation, a method path, caller parameters, and [`Credentials`] into a
//! fully signed GET URL. Signing is deterministic once a [`SignatureSeed`] is pinned, which is how
//! the regression vectors in the test suite are reproduced.

mod token_response;

pub use token_response::*;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
// self
use crate::{
	_prelude::*, auth::Credentials, catalog::Installation, error::ConfigError, http::Scheme,
};

/// Signature method advertised in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LEN: usize = 32;
/// RFC 3986 unreserved characters pass through; everything else is `%XX` encoded.
const UNRESERVED: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Percent-encodes `value` per RFC 3986 (space becomes `%20`, never `+`).
pub fn percent_encode(value: &str) -> String {
	percent_encoding::utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Reverses [`percent_encode`], replacing invalid UTF-8 sequences.
pub fn percent_decode(value: &str) -> String {
	percent_encoding::percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Nonce + timestamp pair bound into a signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureSeed {
	/// Value of `oauth_nonce`.
	pub nonce: String,
	/// Value of `oauth_timestamp` (Unix seconds).
	pub timestamp: i64,
}
impl SignatureSeed {
	/// Creates a seed with explicit values.
	pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
		Self { nonce: nonce.into(), timestamp }
	}

	/// Draws a fresh random nonce and reads the current time.
	pub fn generate() -> Self {
		let nonce =
			rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect();

		Self { nonce, timestamp: OffsetDateTime::now_utc().unix_timestamp() }
	}
}

/// Encodes every pair, then sorts by encoded key and encoded value.
pub fn normalize_parameters<'a, I>(params: I) -> Vec<(String, String)>
where
	I: IntoIterator<Item = (&'a str, &'a str)>,
{
	let mut encoded = params
		.into_iter()
		.map(|(k, v)| (percent_encode(k), percent_encode(v)))
		.collect::<Vec<_>>();

	encoded.sort();

	encoded
}

/// Builds `GET&enc(url)&enc(params)` from a normalized URL and normalized parameters.
pub fn signature_base_string(
	normalized_url: &str,
	normalized_params: &[(String, String)],
) -> String {
	format!(
		"GET&{}&{}",
		percent_encode(normalized_url),
		percent_encode(&join_pairs(normalized_params))
	)
}

/// HMAC-SHA1 of `base_string` keyed by `enc(consumer_secret)&enc(token_secret)`, base64 encoded.
pub fn hmac_sha1_signature(
	consumer_secret: &str,
	token_secret: &str,
	base_string: &str,
) -> String {
	let key = format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret));
	let mut mac =
		HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length.");

	mac.update(base_string.as_bytes());

	STANDARD.encode(mac.finalize().into_bytes())
}

/// Builds the URL of `endpoint` with `params` attached and no OAuth parameters.
pub fn unsigned_url(endpoint: &Url, params: &BTreeMap<String, String>) -> String {
	let normalized =
		normalize_parameters(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

	with_query(&normalized_url(endpoint), &normalized)
}

/// Signs requests for one set of credentials.
#[derive(Clone, Debug)]
pub struct Signer<'a> {
	credentials: &'a Credentials,
	seed: Option<SignatureSeed>,
}
impl<'a> Signer<'a> {
	/// Creates a signer drawing a fresh seed for every URL.
	pub fn new(credentials: &'a Credentials) -> Self {
		Self { credentials, seed: None }
	}

	/// Pins the nonce + timestamp, making output reproducible.
	pub fn with_seed(mut self, seed: SignatureSeed) -> Self {
		self.seed = Some(seed);

		self
	}

	/// Signed URL for `method_path` on `installation`, over HTTPS when `use_ssl` is set.
	pub fn signed_url(
		&self,
		installation: &Installation,
		method_path: &str,
		params: &BTreeMap<String, String>,
		use_ssl: bool,
	) -> Result<String, ConfigError> {
		let scheme = Scheme::from_use_ssl(use_ssl);

		self.signed_url_with_scheme(installation, method_path, params, scheme)
	}

	/// Signed URL for `method_path` on `installation` using an explicit scheme.
	pub fn signed_url_with_scheme(
		&self,
		installation: &Installation,
		method_path: &str,
		params: &BTreeMap<String, String>,
		scheme: Scheme,
	) -> Result<String, ConfigError> {
		let endpoint = installation.endpoint_with_scheme(method_path, scheme)?;

		self.sign_endpoint(&endpoint, params)
	}

	/// Signs a GET of `endpoint` carrying `params`.
	///
	/// Without a consumer key the URL is returned unsigned. Protocol parameters take precedence
	/// over caller parameters of the same name.
	pub fn sign_endpoint(
		&self,
		endpoint: &Url,
		params: &BTreeMap<String, String>,
	) -> Result<String, ConfigError> {
		self.credentials.validate()?;

		if !self.credentials.has_consumer() {
			return Ok(unsigned_url(endpoint, params));
		}

		let seed = self.seed.clone().unwrap_or_else(SignatureSeed::generate);
		let timestamp = seed.timestamp.to_string();
		let mut merged =
			params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<BTreeMap<_, _>>();

		merged.insert("oauth_consumer_key", self.credentials.consumer_key.as_str());
		merged.insert("oauth_nonce", seed.nonce.as_str());
		merged.insert("oauth_signature_method", SIGNATURE_METHOD);
		merged.insert("oauth_timestamp", timestamp.as_str());
		merged.insert("oauth_version", OAUTH_VERSION);

		if self.credentials.has_token() {
			merged.insert("oauth_token", self.credentials.token.as_str());
		}

		let url = normalized_url(endpoint);
		let normalized = normalize_parameters(merged);
		let base_string = signature_base_string(&url, &normalized);
		let signature = hmac_sha1_signature(
			self.credentials.consumer_secret.expose(),
			self.credentials.token_secret.expose(),
			&base_string,
		);

		Ok(format!(
			"{}&oauth_signature={}",
			with_query(&url, &normalized),
			percent_encode(&signature)
		))
	}
}

/// Builds a signed URL in one call with a freshly drawn seed.
pub fn build_signed_url(
	installation: &Installation,
	method_path: &str,
	params: &BTreeMap<String, String>,
	credentials: &Credentials,
	use_ssl: bool,
) -> Result<String, ConfigError> {
	Signer::new(credentials).signed_url(installation, method_path, params, use_ssl)
}

fn normalized_url(endpoint: &Url) -> String {
	let mut url = endpoint.clone();

	url.set_query(None);
	url.set_fragment(None);

	url.into()
}

fn join_pairs(pairs: &[(String, String)]) -> String {
	pairs.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&")
}

fn with_query(url: &str, pairs: &[(String, String)]) -> String {
	if pairs.is_empty() { url.to_owned() } else { format!("{url}?{}", join_pairs(pairs)) }
}
