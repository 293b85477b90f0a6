// crates.io
use httpmock::prelude::*;
// self
use keyring_connector::{
	_preludet::*,
	connector::RequestParams,
	error::{ErrorKind, REQUEST_ERROR_CODE},
	service::{ServiceDescriptor, ServiceName},
	store::TokenStore,
};

fn build_descriptor(requires_token: bool) -> ServiceDescriptor {
	let name =
		ServiceName::new("youtube").expect("Service name should be valid for connector tests.");

	ServiceDescriptor::builder(name)
		.label("YouTube")
		.admin_url(Url::parse(TEST_ADMIN_URL).expect("Test admin URL should parse successfully."))
		.requires_token(requires_token)
		.build()
		.expect("Service descriptor should build successfully.")
}

#[test]
fn verified_token_authorizes_videos_request() {
	let server = MockServer::start();
	let (connector, store, _) = build_reqwest_test_connector(build_descriptor(true), Some("abc123"));

	assert!(connector.is_configured());

	let id = connector.verify_token().expect("Verification should succeed.");
	let token = store
		.load(&id)
		.expect("Token store load should succeed.")
		.expect("Verified token should be stored.");
	let expected = format!("Basic {}", token.display());
	let mock = server.mock(|when, then| {
		when.method(GET).path("/v3/videos").header("authorization", expected.as_str());
		then.status(200).header("content-type", "application/json").body("[]");
	});
	let response = connector
		.request(server.url("/v3/videos"), RequestParams::default())
		.expect("Authorized request should succeed.");

	mock.assert();

	assert_eq!(response.status, 200);
	assert_eq!(response.body, "[]");
	assert_eq!(connector.last_status(), Some(200));
}

#[test]
fn not_found_surfaces_request_error_with_response() {
	let server = MockServer::start();
	let (connector, _, _) = build_reqwest_test_connector(build_descriptor(false), None);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/v3/missing");
		then.status(404).header("x-reason", "gone").body("{\"error\":\"notFound\"}");
	});
	let err = connector
		.request(server.url("/v3/missing"), RequestParams::default())
		.expect_err("404 responses must surface as errors.");

	mock.assert();

	assert_eq!(err.kind(), ErrorKind::RequestError);
	assert_eq!(err.code(), REQUEST_ERROR_CODE);
	assert_eq!(err.status(), Some(404));

	let response = err.response().expect("Request errors should carry the response.");

	assert_eq!(response.body, "{\"error\":\"notFound\"}");
	assert_eq!(response.headers.get("x-reason").map(String::as_str), Some("gone"));
	assert_eq!(connector.last_status(), Some(404));
}

#[test]
fn lowercase_post_sends_body_and_query() {
	let server = MockServer::start();
	let (connector, _, _) = build_reqwest_test_connector(build_descriptor(false), None);
	let mock = server.mock(|when, then| {
		when.method(POST)
			.path("/v3/playlists")
			.query_param("part", "snippet")
			.header("content-type", "application/json")
			.body("{\"title\":\"demo\"}");
		then.status(201).body("created");
	});
	let params = RequestParams::default()
		.method("post")
		.query("part", "snippet")
		.header("Content-Type", "application/json")
		.body("{\"title\":\"demo\"}");
	let response = connector
		.request(server.url("/v3/playlists"), params)
		.expect("201 responses should succeed.");

	mock.assert();

	assert_eq!(response.status, 201);
	assert_eq!(response.body, "created");
}

#[test]
fn token_free_service_sends_no_authorization() {
	let server = MockServer::start();
	let (connector, _, _) = build_reqwest_test_connector(build_descriptor(false), None);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/v3/search").header_missing("authorization");
		then.status(200).body("OK");
	});
	let response = connector
		.request(server.url("/v3/search"), RequestParams::default())
		.expect("Token-free request should succeed.");

	mock.assert();

	assert_eq!(response.body, "OK");
}

#[test]
fn required_token_blocks_dispatch() {
	let server = MockServer::start();
	let (connector, _, _) = build_reqwest_test_connector(build_descriptor(true), Some("abc123"));
	let mock = server.mock(|when, then| {
		when.any_request();
		then.status(200);
	});
	let err = connector
		.request(server.url("/v3/videos"), RequestParams::default())
		.expect_err("Requests without a token must fail.");

	assert_eq!(err.kind(), ErrorKind::NoToken);
	assert_eq!(err.code(), REQUEST_ERROR_CODE);

	mock.assert_calls(0);
}
