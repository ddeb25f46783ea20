//! Installations (server deployments) identified by their base URL.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError, http::Scheme};

/// One deployment of the API, identified by its base URL.
///
/// Identity is the exact, case-sensitive base URL string as supplied. Construction validates that
/// the URL is absolute and uses `http` or `https`; method paths are joined onto it as if it ended
/// with `/`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Installation(String);
impl Installation {
	/// Validates and wraps a base URL.
	pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
		let view = base_url.as_ref();

		validate_base_url(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Base URL exactly as supplied.
	pub fn base_url(&self) -> &str {
		&self.0
	}

	/// Absolute URL of `method_path` on this installation, keeping the base URL's scheme.
	///
	/// Leading slashes in `method_path` are ignored so paths always resolve below the base URL.
	pub fn endpoint(&self, method_path: &str) -> Result<Url, ConfigError> {
		let base = parse_base_url(&self.0)?;

		base.join(method_path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidBaseUrl { url: self.0.clone(), source })
	}

	/// Like [`Installation::endpoint`] but forcing `scheme`.
	pub fn endpoint_with_scheme(
		&self,
		method_path: &str,
		scheme: Scheme,
	) -> Result<Url, ConfigError> {
		let mut url = self.endpoint(method_path)?;

		if url.scheme() != scheme.as_str() {
			url.set_scheme(scheme.as_str())
				.map_err(|_| ConfigError::UnsupportedScheme { url: self.0.clone() })?;
		}

		Ok(url)
	}
}
impl Deref for Installation {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Installation {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Installation> for String {
	fn from(value: Installation) -> Self {
		value.0
	}
}
impl TryFrom<String> for Installation {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_base_url(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for Installation {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for Installation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Installation({})", self.0)
	}
}
impl Display for Installation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Localized string as served by the installations endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LangDict {
	/// Polish variant.
	pub pl: Option<String>,
	/// English variant.
	pub en: Option<String>,
}

/// Entry of the installation list published by the mother server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationEntry {
	/// Installation identity.
	pub base_url: Installation,
	/// Server software version, when published.
	#[serde(default)]
	pub version: Option<String>,
	/// Name of the institution running the installation.
	#[serde(default)]
	pub institution_name: Option<LangDict>,
	/// Administrative contacts.
	#[serde(default)]
	pub contact_emails: Vec<String>,
}

fn parse_base_url(view: &str) -> Result<Url, ConfigError> {
	let mut url = Url::parse(view)
		.map_err(|source| ConfigError::InvalidBaseUrl { url: view.to_owned(), source })?;

	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url.set_query(None);
	url.set_fragment(None);

	Ok(url)
}

fn validate_base_url(view: &str) -> Result<(), ConfigError> {
	let url = parse_base_url(view)?;

	match url.scheme() {
		"http" | "https" if url.has_host() => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { url: view.to_owned() }),
	}
}
