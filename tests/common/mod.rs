//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::time::Duration;
// crates.io
use parking_lot::Mutex;
// self
use usos_api_browser::{
	catalog::Installation,
	error::TransportError,
	http::{HttpResponse, HttpTransport},
};

pub const METHOD_INDEX: &str = r#"[
	{"name": "services/apiref/method", "brief_description": "Describe a method"},
	{"name": "services/apisrv/now", "brief_description": "Current server time"},
	{"name": "services/users/user", "brief_description": "Get information on user"},
	{"name": "services/oauth/request_token", "brief_description": "Acquire a request token"}
]"#;
pub const SCOPES: &str = r#"[
	{"key": "studies", "developers_description": "Access to your studies."},
	{"key": "email", "developers_description": "Your email address."}
]"#;
pub const USER_DETAIL: &str = r#"{
	"name": "services/users/user",
	"short_name": "user",
	"brief_description": "Get information on user",
	"ref_url": "https://usos.example.edu/developers/api/services/users/#user",
	"arguments": [
		{"name": "user_id", "is_required": false, "is_deprecated": false, "default_value": null},
		{"name": "fields", "is_required": false, "is_deprecated": false, "default_value": "id|first_name|last_name"}
	],
	"auth_options": {"consumer": "required", "token": "optional", "administrative_only": false, "ssl_required": false}
}"#;

type Handler = dyn Fn(&str) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Transport answering from a closure and logging every requested URL.
pub struct StubTransport {
	handler: Box<Handler>,
	calls: Mutex<Vec<String>>,
}
impl StubTransport {
	pub fn new<F>(handler: F) -> Self
	where
		F: 'static + Send + Sync + Fn(&str) -> Result<HttpResponse, TransportError>,
	{
		Self { handler: Box::new(handler), calls: Mutex::new(Vec::new()) }
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}
}
impl HttpTransport for StubTransport {
	fn get(&self, url: &str, _timeout: Option<Duration>) -> Result<HttpResponse, TransportError> {
		self.calls.lock().push(url.to_owned());

		(self.handler)(url)
	}
}

pub fn refused(url: &str) -> TransportError {
	TransportError::network(
		url,
		std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
	)
}

pub fn installation(base_url: &str) -> Installation {
	Installation::new(base_url).expect("Test base URL should be valid.")
}

/// Value of query parameter `key` in `url`, still percent-encoded.
pub fn query_value<'a>(url: &'a str, key: &str) -> Option<&'a str> {
	let (_, query) = url.split_once('?')?;

	query.split('&').find_map(|pair| {
		let (k, v) = pair.split_once('=')?;

		(k == key).then_some(v)
	})
}
