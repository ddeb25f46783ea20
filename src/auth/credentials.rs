//! Consumer and token credentials plus the signing toggles a host exposes to its users.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Credentials used to sign a single request.
///
/// Every field may be empty. An empty consumer key means "do not sign"; a token is only
/// meaningful alongside a consumer key (see [`Credentials::validate`]). The core never stores
/// credentials; hosts pass them per call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
	/// Consumer key registered with the installation.
	pub consumer_key: String,
	/// Consumer secret matching [`Credentials::consumer_key`].
	pub consumer_secret: Secret,
	/// Request or access token.
	pub token: String,
	/// Secret matching [`Credentials::token`].
	pub token_secret: Secret,
}
impl Credentials {
	/// Credentials that produce unsigned URLs.
	pub fn none() -> Self {
		Self::default()
	}

	/// Consumer-only credentials.
	pub fn consumer(key: impl Into<String>, secret: impl Into<Secret>) -> Self {
		Self { consumer_key: key.into(), consumer_secret: secret.into(), ..Self::default() }
	}

	/// Attaches a token + secret pair.
	pub fn with_token(mut self, token: impl Into<String>, secret: impl Into<Secret>) -> Self {
		self.token = token.into();
		self.token_secret = secret.into();

		self
	}

	/// Returns true when a consumer key is present, i.e. the request will be signed.
	pub fn has_consumer(&self) -> bool {
		!self.consumer_key.is_empty()
	}

	/// Returns true when a token is present.
	pub fn has_token(&self) -> bool {
		!self.token.is_empty()
	}

	/// Copy of these credentials with the token pair removed.
	pub fn consumer_only(&self) -> Self {
		Self::consumer(self.consumer_key.clone(), self.consumer_secret.clone())
	}

	/// Rejects token signing without consumer signing.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.has_token() && !self.has_consumer() {
			return Err(ConfigError::TokenWithoutConsumer);
		}

		Ok(())
	}
}

/// Per-call signing toggles ("use SSL", "sign with consumer key", "sign with token").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningOptions {
	/// Sign with the consumer key + secret.
	pub sign_with_consumer: bool,
	/// Sign with the token + secret as well. Requires `sign_with_consumer`.
	pub sign_with_token: bool,
	/// Call the method over HTTPS.
	pub use_ssl: bool,
}
impl SigningOptions {
	/// Unsigned call over the given transport security.
	pub fn unsigned(use_ssl: bool) -> Self {
		Self { sign_with_consumer: false, sign_with_token: false, use_ssl }
	}

	/// Consumer-signed call.
	pub fn consumer(use_ssl: bool) -> Self {
		Self { sign_with_consumer: true, sign_with_token: false, use_ssl }
	}

	/// Consumer + token signed call.
	pub fn consumer_and_token(use_ssl: bool) -> Self {
		Self { sign_with_consumer: true, sign_with_token: true, use_ssl }
	}

	/// Projects the full credential set onto what these toggles allow to sign with.
	pub fn apply(&self, credentials: &Credentials) -> Result<Credentials, ConfigError> {
		if self.sign_with_token && !self.sign_with_consumer {
			return Err(ConfigError::TokenWithoutConsumer);
		}

		let mut effective = Credentials::none();

		if self.sign_with_consumer {
			effective = credentials.consumer_only();
		}
		if self.sign_with_token {
			effective = effective
				.with_token(credentials.token.clone(), credentials.token_secret.clone());
		}

		effective.validate()?;

		Ok(effective)
	}
}
