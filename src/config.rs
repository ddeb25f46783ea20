//! Browser configuration: mother installation, per-call timeout, and the scheme fallback policy.

// self
use crate::{
	_prelude::*,
	catalog::Installation,
	http::{Scheme, SchemePolicy},
};

/// Installation that publishes the list of known installations.
pub const DEFAULT_MOTHER_INSTALLATION: &str = "https://apps.usos.edu.pl/";
/// Per-call timeout passed to the transport unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while constructing or validating a [`BrowserConfig`].
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum BrowserConfigError {
	/// Timeouts must be positive.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// At least one scheme must be attempted.
	#[error("Scheme policy must contain at least one scheme.")]
	EmptySchemePolicy,
}

/// Settings shared by the catalog client, the session, and token acquisition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
	/// Installation queried for the installation list.
	pub mother_installation: Installation,
	/// Timeout handed to the transport on every call.
	#[serde(with = "duration_secs")]
	pub timeout: Duration,
	/// Schemes tried, in order, for token endpoint calls.
	pub scheme_policy: SchemePolicy,
	/// Installations appended to the published list when missing from it.
	pub extra_installations: Vec<Installation>,
}
impl BrowserConfig {
	/// Starts a builder seeded with the defaults.
	pub fn builder() -> BrowserConfigBuilder {
		BrowserConfigBuilder::new()
	}

	/// Checks invariants that deserialization alone cannot enforce.
	pub fn validate(&self) -> Result<(), BrowserConfigError> {
		if self.timeout.is_zero() {
			return Err(BrowserConfigError::ZeroTimeout);
		}
		if self.scheme_policy.is_empty() {
			return Err(BrowserConfigError::EmptySchemePolicy);
		}

		Ok(())
	}
}
impl Default for BrowserConfig {
	fn default() -> Self {
		Self {
			mother_installation: default_mother_installation(),
			timeout: DEFAULT_TIMEOUT,
			scheme_policy: SchemePolicy::default(),
			extra_installations: Vec::new(),
		}
	}
}

/// Builder for [`BrowserConfig`] values.
#[derive(Debug)]
pub struct BrowserConfigBuilder {
	/// Installation queried for the installation list.
	pub mother_installation: Installation,
	/// Timeout handed to the transport on every call.
	pub timeout: Duration,
	/// Schemes tried for token endpoint calls, before deduplication.
	pub schemes: Vec<Scheme>,
	/// Installations appended to the published list.
	pub extra_installations: Vec<Installation>,
}
impl BrowserConfigBuilder {
	/// Creates a builder seeded with the defaults.
	pub fn new() -> Self {
		Self {
			mother_installation: default_mother_installation(),
			timeout: DEFAULT_TIMEOUT,
			schemes: SchemePolicy::default().iter().collect(),
			extra_installations: Vec::new(),
		}
	}

	/// Overrides the mother installation.
	pub fn mother_installation(mut self, installation: Installation) -> Self {
		self.mother_installation = installation;

		self
	}

	/// Overrides the per-call timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Replaces the scheme attempt order.
	pub fn schemes<I>(mut self, schemes: I) -> Self
	where
		I: IntoIterator<Item = Scheme>,
	{
		self.schemes = schemes.into_iter().collect();

		self
	}

	/// Appends one installation to the published list.
	pub fn extra_installation(mut self, installation: Installation) -> Self {
		self.extra_installations.push(installation);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<BrowserConfig, BrowserConfigError> {
		let config = BrowserConfig {
			mother_installation: self.mother_installation,
			timeout: self.timeout,
			scheme_policy: SchemePolicy::new(self.schemes)?,
			extra_installations: self.extra_installations,
		};

		config.validate()?;

		Ok(config)
	}
}
impl Default for BrowserConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn default_mother_installation() -> Installation {
	DEFAULT_MOTHER_INSTALLATION
		.parse()
		.expect("Default mother installation must be a valid base URL.")
}

mod duration_secs {
	// crates.io
	use serde::{Deserializer, Serializer};
	// self
	use crate::_prelude::*;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_u64(value.as_secs())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		u64::deserialize(deserializer).map(Duration::from_secs)
	}
}
