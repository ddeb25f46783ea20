//! Demonstrates loading an installation's catalog into a [`Session`], walking the method tree,
//! and calling a method, all against a local mock installation.

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use usos_api_browser::{
	auth::{Credentials, SigningOptions},
	catalog::{Installation, TreeOptions},
	config::BrowserConfig,
	http::ReqwestTransport,
	session::Session,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/method_index");
		then.status(200).body(
			r#"[{"name":"services/apisrv/now","brief_description":"Current server time"},
			{"name":"services/users/user","brief_description":"Get information on user"}]"#,
		);
	});
	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/scopes");
		then.status(200)
			.body(r#"[{"key":"studies","developers_description":"Access to your studies."}]"#);
	});
	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/method").query_param("name", "services/users/user");
		then.status(200).body(
			r#"{"name":"services/users/user","brief_description":"Get information on user",
			"ref_url":"","arguments":[{"name":"fields","is_required":false}],
			"auth_options":{"consumer":"required","token":"optional","ssl_required":false}}"#,
		);
	});
	server.mock(|when, then| {
		when.method(GET).path("/services/apisrv/now");
		then.status(200).body(r#""2024-01-01 12:00:00.000000""#);
	});

	let installation = Installation::new(server.url("/"))?;
	let transport = Arc::new(ReqwestTransport::new()?);
	let mut session = Session::new(transport, BrowserConfig::default(), installation)?
		.with_tree_options(TreeOptions { skip_leading_segments: 1 });

	for (path, method) in session.refresh()?.iter() {
		println!("{path}: {}", method.brief_description);
	}

	let detail = session.method_detail("services/users/user")?;

	for argument in detail.form_arguments() {
		println!("  argument {} (required: {})", argument.name, argument.is_required);
	}

	let credentials = Credentials::consumer("demo-key", "demo-secret");
	let url = session.method_url(
		"services/users/user",
		&BTreeMap::from([("fields".to_owned(), "id|first_name".to_owned())]),
		&credentials,
		SigningOptions::consumer(false),
	)?;

	println!("Signed URL: {url}");

	let response = session.execute(
		"services/apisrv/now",
		&BTreeMap::new(),
		&Credentials::none(),
		SigningOptions::unsigned(false),
	)?;

	println!("Server time: {}", response.readable());

	Ok(())
}
