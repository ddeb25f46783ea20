//! Demonstrates the three-legged token acquisition against a local mock installation.
//!
//! The mock only speaks plain HTTP, so the default scheme policy's HTTPS attempt fails and the
//! flow falls back to HTTP for both token calls.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use usos_api_browser::{
	auth::Credentials,
	catalog::Installation,
	config::BrowserConfig,
	error::BoxError,
	http::ReqwestTransport,
	session::Session,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET)
			.path("/services/oauth/request_token")
			.query_param("scopes", "studies|email");
		then.status(200).body("oauth_token=demo-request&oauth_token_secret=demo-request-secret");
	});
	server.mock(|when, then| {
		when.method(GET)
			.path("/services/oauth/access_token")
			.query_param("oauth_verifier", "12345678");
		then.status(200).body("oauth_token=demo-access&oauth_token_secret=demo-access-secret");
	});

	let installation = Installation::new(server.url("/"))?;
	let session =
		Session::new(Arc::new(ReqwestTransport::new()?), BrowserConfig::default(), installation)?;

	println!("Consumer keys are issued at {}", session.developers_url()?);

	let consumer = Credentials::consumer("demo-key", "demo-secret");
	let mut flow = session.start_token_acquisition(&consumer)?;
	let request = flow.request_token(["studies", "email"])?;

	println!("Request token: {}", request.token);

	let launcher = |url: &str| -> std::result::Result<(), BoxError> {
		println!("Open {url} and copy the PIN.");

		Ok(())
	};
	let prompt = flow.open_authorization(&launcher)?;

	println!("Authorization page: {} (launched: {})", prompt.url, prompt.launched);

	let access = flow.submit_verifier("12345678")?.clone();

	println!("Access token: {} (state: {})", access.token, flow.state());

	Ok(())
}
