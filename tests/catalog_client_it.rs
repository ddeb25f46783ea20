#![cfg(feature = "reqwest")]

mod common;

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use usos_api_browser::{
	catalog::{AuthRequirement, CatalogClient, Installation},
	config::BrowserConfig,
	error::{Error, TransportError},
	http::ReqwestTransport,
};

fn client(config: BrowserConfig) -> CatalogClient<ReqwestTransport> {
	let transport = ReqwestTransport::new().expect("Reqwest transport should build.");

	CatalogClient::new(Arc::new(transport), config).expect("Test config should validate.")
}

fn mock_installation(server: &MockServer) -> Installation {
	installation(&server.url("/"))
}

#[test]
fn lists_methods_in_server_order() {
	let server = MockServer::start();
	let mock = server.mock(|when, then| {
		when.method(GET).path("/services/apiref/method_index");
		then.status(200).header("content-type", "application/json").body(METHOD_INDEX);
	});
	let methods = client(BrowserConfig::default())
		.list_methods(&mock_installation(&server))
		.expect("Method index should load.");

	mock.assert_calls(1);

	assert_eq!(
		methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
		vec![
			"services/apiref/method",
			"services/apisrv/now",
			"services/users/user",
			"services/oauth/request_token",
		],
	);
	assert!(methods.iter().all(|m| !m.is_detailed() && m.arguments.is_empty()));
}

#[test]
fn method_detail_is_requested_by_name() {
	let server = MockServer::start();
	let mock = server.mock(|when, then| {
		when.method(GET)
			.path("/services/apiref/method")
			.query_param("name", "services/users/user");
		then.status(200).body(USER_DETAIL);
	});
	let method = client(BrowserConfig::default())
		.get_method_detail(&mock_installation(&server), "services/users/user")
		.expect("Method detail should load.");

	mock.assert_calls(1);

	assert!(method.is_detailed());
	assert_eq!(method.auth_options_consumer(), AuthRequirement::Required);
	assert_eq!(method.auth_options_token(), AuthRequirement::Optional);
	assert_eq!(
		method.arguments.iter().map(|a| (a.name.as_str(), a.is_required)).collect::<Vec<_>>(),
		vec![("user_id", false), ("fields", false)],
	);
}

#[test]
fn scopes_decode_developer_descriptions() {
	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/scopes");
		then.status(200).body(SCOPES);
	});

	let scopes = client(BrowserConfig::default())
		.list_scopes(&mock_installation(&server))
		.expect("Scopes should load.");

	assert_eq!(scopes.len(), 2);
	assert_eq!(scopes[0].key, "studies");
	assert_eq!(scopes[0].description, "Access to your studies.");
}

#[test]
fn installations_come_from_the_mother_server() {
	let server = MockServer::start();
	let mother = mock_installation(&server);
	let body = format!(
		r#"[{{"base_url":"https://usos.example.edu/","version":"7.1","institution_name":{{"pl":"Uczelnia","en":"University"}},"contact_emails":[]}},{{"base_url":"{}"}}]"#,
		mother.base_url(),
	);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/services/apisrv/installations");
		then.status(200).body(&body);
	});
	let config = BrowserConfig::builder()
		.mother_installation(mother.clone())
		.extra_installation(mother.clone())
		.extra_installation(installation("http://localhost:8000/"))
		.build()
		.expect("Config should build.");
	let entries = client(config).list_installation_entries().expect("Installations should load.");

	mock.assert_calls(1);

	assert_eq!(
		entries.iter().map(|e| e.base_url.base_url()).collect::<Vec<_>>(),
		vec!["https://usos.example.edu/", mother.base_url(), "http://localhost:8000/"],
	);
	assert_eq!(entries[0].version.as_deref(), Some("7.1"));
}

#[test]
fn non_success_statuses_keep_the_body() {
	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/method_index");
		then.status(503).body("Maintenance in progress.");
	});

	let err = client(BrowserConfig::default())
		.list_methods(&mock_installation(&server))
		.expect_err("503 must fail.");

	match err {
		Error::Transport(TransportError::Status { status, body, .. }) => {
			assert_eq!(status, 503);
			assert_eq!(body, "Maintenance in progress.");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[test]
fn malformed_json_is_a_decode_error() {
	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/scopes");
		then.status(200).body(r#"[{"key": 7}]"#);
	});

	let err = client(BrowserConfig::default())
		.list_scopes(&mock_installation(&server))
		.expect_err("Non-string key must fail.");

	match err {
		Error::Decode(decode) => assert_eq!(decode.path(), "[0].key"),
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[test]
fn slow_servers_time_out() {
	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(GET).path("/services/apiref/scopes");
		then.status(200).delay(Duration::from_secs(3)).body(SCOPES);
	});

	let config = BrowserConfig::builder()
		.timeout(Duration::from_secs(1))
		.build()
		.expect("Config should build.");
	let err = client(config)
		.list_scopes(&mock_installation(&server))
		.expect_err("Delayed answer must time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
}
