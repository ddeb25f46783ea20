//! Blocking client for the catalog endpoints (installations, methods, method detail, scopes).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	catalog::{
		Installation, InstallationEntry, Method, Scope,
		method::{MethodDetail, MethodIndexEntry},
	},
	config::BrowserConfig,
	error::{ConfigError, DecodeError},
	http::{self, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	oauth,
};

/// Path of the installation list on the mother installation.
pub const INSTALLATIONS_PATH: &str = "services/apisrv/installations";
/// Path of the method index.
pub const METHOD_INDEX_PATH: &str = "services/apiref/method_index";
/// Path of the method detail endpoint.
pub const METHOD_DETAIL_PATH: &str = "services/apiref/method";
/// Path of the scope list.
pub const SCOPES_PATH: &str = "services/apiref/scopes";

/// Fetches and decodes catalog resources. Holds no per-installation state.
#[derive(Debug)]
pub struct CatalogClient<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	config: BrowserConfig,
}
impl<T> Clone for CatalogClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone(), config: self.config.clone() }
	}
}
impl<T> CatalogClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client over `transport` using `config`.
	///
	/// Fails when `config` does not pass [`BrowserConfig::validate`].
	pub fn new(transport: Arc<T>, config: BrowserConfig) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self { transport, config })
	}

	/// Shared transport handle.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Active configuration.
	pub fn config(&self) -> &BrowserConfig {
		&self.config
	}

	/// Base URLs of all known installations, extras appended.
	pub fn list_installations(&self) -> Result<Vec<Installation>> {
		Ok(self.list_installation_entries()?.into_iter().map(|entry| entry.base_url).collect())
	}

	/// Installation records published by the mother installation, extras appended.
	///
	/// Configured extra installations missing from the published list are appended as bare
	/// entries, in configuration order.
	pub fn list_installation_entries(&self) -> Result<Vec<InstallationEntry>> {
		let mut entries: Vec<InstallationEntry> = self.get_json(
			"installations",
			&self.config.mother_installation,
			INSTALLATIONS_PATH,
			&BTreeMap::new(),
		)?;

		for extra in &self.config.extra_installations {
			if !entries.iter().any(|entry| &entry.base_url == extra) {
				entries.push(InstallationEntry {
					base_url: extra.clone(),
					version: None,
					institution_name: None,
					contact_emails: Vec::new(),
				});
			}
		}

		Ok(entries)
	}

	/// Listing-form methods advertised by `installation`, in server order.
	pub fn list_methods(&self, installation: &Installation) -> Result<Vec<Method>> {
		let entries: Vec<MethodIndexEntry> =
			self.get_json("method index", installation, METHOD_INDEX_PATH, &BTreeMap::new())?;

		Ok(entries.into_iter().map(Method::from).collect())
	}

	/// Detail-form record of `method_name` on `installation`.
	pub fn get_method_detail(
		&self,
		installation: &Installation,
		method_name: &str,
	) -> Result<Method> {
		let params = BTreeMap::from([("name".to_owned(), method_name.to_owned())]);
		let detail: MethodDetail =
			self.get_json("method detail", installation, METHOD_DETAIL_PATH, &params)?;

		Ok(detail.into())
	}

	/// Scopes advertised by `installation`.
	pub fn list_scopes(&self, installation: &Installation) -> Result<Vec<Scope>> {
		self.get_json("scopes", installation, SCOPES_PATH, &BTreeMap::new())
	}

	/// Fetches an arbitrary unsigned resource as text.
	pub fn get_text(
		&self,
		installation: &Installation,
		method_path: &str,
		params: &BTreeMap<String, String>,
	) -> Result<String> {
		let endpoint = installation.endpoint(method_path)?;
		let url = oauth::unsigned_url(&endpoint, params);

		Ok(http::fetch_text(&*self.transport, &url, Some(self.config.timeout))?)
	}

	fn get_json<D>(
		&self,
		resource: &'static str,
		installation: &Installation,
		method_path: &str,
		params: &BTreeMap<String, String>,
	) -> Result<D>
	where
		D: DeserializeOwned,
	{
		let _guard = FlowSpan::new(FlowKind::Catalog, resource).entered();

		obs::record_flow_outcome(FlowKind::Catalog, FlowOutcome::Attempt);

		let result = self
			.get_text(installation, method_path, params)
			.and_then(|body| decode_json(resource, &body).map_err(Error::from));

		obs::record_flow_outcome(FlowKind::Catalog, FlowOutcome::of(&result));

		result
	}
}

/// Decodes `body`, reporting the JSON path of the first mismatch.
pub(crate) fn decode_json<D>(resource: &'static str, body: &str) -> Result<D, DecodeError>
where
	D: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError { resource, source })
}

#[cfg(test)]
mod tests {
	// crates.io
	use parking_lot::Mutex;
	// self
	use super::*;
	use crate::{
		config::BrowserConfigError,
		error::{Error, TransportError},
		http::HttpResponse,
	};

	#[derive(Debug, Default)]
	struct RecordingTransport {
		responses: Mutex<HashMap<String, HttpResponse>>,
		requests: Mutex<Vec<(String, Option<Duration>)>>,
	}
	impl RecordingTransport {
		fn respond(self, url: &str, status: u16, body: &str) -> Self {
			self.responses.lock().insert(url.to_owned(), HttpResponse::new(status, body));

			self
		}
	}
	impl HttpTransport for RecordingTransport {
		fn get(
			&self,
			url: &str,
			timeout: Option<Duration>,
		) -> Result<HttpResponse, TransportError> {
			self.requests.lock().push((url.to_owned(), timeout));

			Ok(self
				.responses
				.lock()
				.get(url)
				.cloned()
				.unwrap_or_else(|| HttpResponse::new(404, "Not found.")))
		}
	}

	fn installation() -> Installation {
		Installation::new("https://usos.example.edu/").expect("Valid base URL.")
	}

	#[test]
	fn method_detail_uses_name_query_and_configured_timeout() {
		let transport = Arc::new(RecordingTransport::default().respond(
			"https://usos.example.edu/services/apiref/method?name=services%2Fapisrv%2Fnow",
			200,
			r#"{"name":"services/apisrv/now","brief_description":"Now","ref_url":"r","arguments":[],"auth_options":{"consumer":"ignored","token":"ignored","ssl_required":false}}"#,
		));
		let client = CatalogClient::new(transport.clone(), BrowserConfig::default())
			.expect("Default config should validate.");
		let method = client
			.get_method_detail(&installation(), "services/apisrv/now")
			.expect("Detail should load.");

		assert!(method.is_detailed());

		let requests = transport.requests.lock();

		assert_eq!(requests[0].1, Some(Duration::from_secs(30)));
	}

	#[test]
	fn malformed_payloads_report_their_path() {
		let transport = Arc::new(RecordingTransport::default().respond(
			"https://usos.example.edu/services/apiref/method_index",
			200,
			r#"[{"name":"a/b","brief_description":"ok"},{"brief_description":"missing name"}]"#,
		));
		let client = CatalogClient::new(transport, BrowserConfig::default())
			.expect("Default config should validate.");
		let err = client.list_methods(&installation()).expect_err("Missing name must fail.");

		match err {
			Error::Decode(decode) => {
				assert_eq!(decode.resource, "method index");
				assert_eq!(decode.path(), "[1]");
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn incomplete_method_detail_is_a_decode_error() {
		let transport = Arc::new(RecordingTransport::default().respond(
			"https://usos.example.edu/services/apiref/method?name=services%2Fx%2Fy",
			200,
			r#"{"name":"services/x/y","brief_description":"d","ref_url":"r","arguments":[],"auth_options":{"consumer":"required","token":"optional"}}"#,
		));
		let client = CatalogClient::new(transport, BrowserConfig::default())
			.expect("Default config should validate.");
		let err = client
			.get_method_detail(&installation(), "services/x/y")
			.expect_err("Detail without ssl_required must fail.");

		match err {
			Error::Decode(decode) => {
				assert_eq!(decode.resource, "method detail");
				assert_eq!(decode.path(), "auth_options");
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn invalid_configs_are_rejected_up_front() {
		let config: BrowserConfig =
			serde_json::from_str(r#"{"timeout":0}"#).expect("Zero timeout still deserializes.");
		let err = CatalogClient::new(Arc::new(RecordingTransport::default()), config)
			.expect_err("Zero timeout must be rejected.");

		assert!(matches!(err, ConfigError::InvalidConfig(BrowserConfigError::ZeroTimeout)));
	}

	#[test]
	fn extra_installations_are_appended_once() {
		let config = BrowserConfig::builder()
			.extra_installation(installation())
			.extra_installation(
				Installation::new("http://localhost:8000/").expect("Valid base URL."),
			)
			.build()
			.expect("Config should build.");
		let transport = Arc::new(RecordingTransport::default().respond(
			"https://apps.usos.edu.pl/services/apisrv/installations",
			200,
			r#"[{"base_url":"https://usos.example.edu/"}]"#,
		));
		let client = CatalogClient::new(transport, config).expect("Built config should validate.");
		let installations = client.list_installations().expect("Installations should load.");

		assert_eq!(
			installations.iter().map(|i| i.base_url()).collect::<Vec<_>>(),
			vec!["https://usos.example.edu/", "http://localhost:8000/"],
		);
	}
}
