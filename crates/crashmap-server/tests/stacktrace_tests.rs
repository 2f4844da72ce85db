// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for whole-trace symbolication.
//!
//! Tests cover:
//! - Mixed batches: parsable and unparsable lines, local and remote artifacts,
//!   inline, external and missing source maps, unreachable origins
//! - Index alignment of results with input lines
//! - Identical output for repeated requests

use axum::{
	body::Body,
	http::{Method, Request, StatusCode},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crashmap_server::{create_router, AppState, STACKTRACE_PATH};
use crashmap_server_config::SymbolicateConfigLayer;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INLINE_MAP: &str = r#"{"version":3,"sources":["route-module:app/root.tsx"],"sourcesContent":["export default function Root() {}"],"names":[],"mappings":"AAIE"}"#;

const EXTERNAL_MAP: &str = r#"{"version":3,"sourceRoot":"webpack://app/","sources":["src/app.ts"],"names":[],"mappings":"AACA"}"#;

struct Fixture {
	dir: TempDir,
	origin: MockServer,
}

impl Fixture {
	async fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		write(
			dir.path(),
			"build/index.js",
			&format!(
				"x();\n//# sourceMappingURL=data:application/json;base64,{}\n",
				STANDARD.encode(INLINE_MAP)
			),
		);
		write(dir.path(), "build/plain.js", "export const plain = true;\n");

		let origin = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/dist/app.js"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_string("var a;\n//# sourceMappingURL=/dist/app.js.map\n"),
			)
			.mount(&origin)
			.await;
		Mock::given(method("GET"))
			.and(path("/dist/app.js.map"))
			.respond_with(ResponseTemplate::new(200).set_body_string(EXTERNAL_MAP))
			.mount(&origin)
			.await;

		Self { dir, origin }
	}

	fn root(&self) -> String {
		self.dir.path().to_str().unwrap().to_string()
	}

	fn local(&self, relative: &str) -> String {
		self.dir.path().join(relative).to_str().unwrap().to_string()
	}

	fn app(&self) -> axum::Router {
		let config = SymbolicateConfigLayer {
			working_root: Some(self.dir.path().to_path_buf()),
			max_concurrency: Some(3),
			..Default::default()
		}
		.finalize();
		create_router(AppState::from_config(config).unwrap())
	}
}

fn write(root: &Path, relative: &str, content: &str) {
	let file = root.join(relative);
	std::fs::create_dir_all(file.parent().unwrap()).unwrap();
	std::fs::write(file, content).unwrap();
}

async fn post_stacktrace(app: axum::Router, lines: &[String]) -> Value {
	let response = app
		.oneshot(
			Request::builder()
				.method(Method::POST)
				.uri(STACKTRACE_PATH)
				.header("content-type", "application/json")
				.body(Body::from(json!({ "stacktrace": lines }).to_string()))
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&body).unwrap()
}

fn mixed_trace(fixture: &Fixture) -> Vec<String> {
	vec![
		"Error: something broke".to_string(),
		format!("    at loader ({}:1:0)", fixture.local("build/index.js")),
		format!("    at {}:2:5", fixture.local("build/plain.js")),
		format!("    at render ({}/dist/app.js:1:0)", fixture.origin.uri()),
		format!("    at {}:1:1", fixture.local("build/missing.js")),
		"    at async Promise.all (index 0)".to_string(),
		format!("    at {}/dist/gone.js:1:1", fixture.origin.uri()),
	]
}

#[tokio::test]
async fn test_mixed_batch_is_index_aligned() {
	let fixture = Fixture::new().await;
	let lines = mixed_trace(&fixture);

	let results = post_stacktrace(fixture.app(), &lines).await;
	let results = results.as_array().unwrap();

	assert_eq!(results.len(), lines.len());

	assert!(results[0].is_null());

	assert_eq!(
		results[1],
		json!({
			"root": fixture.root(),
			"file": "app/root.tsx",
			"sourceContent": "export default function Root() {}",
			"line": 5,
			"column": 2,
		})
	);

	assert_eq!(results[2]["file"], "/build/plain.js");
	assert_eq!(results[2]["line"], 2);
	assert_eq!(results[2]["column"], 5);
	assert_eq!(results[2]["sourceContent"], "export const plain = true;\n");

	assert_eq!(results[3]["file"], "webpack://app/src/app.ts");
	assert_eq!(results[3]["line"], 2);
	assert_eq!(results[3]["column"], 0);
	assert!(results[3]["sourceContent"].is_null());

	assert!(results[4].is_null());
	assert!(results[5].is_null());
	assert!(results[6].is_null());
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
	let fixture = Fixture::new().await;
	let lines = mixed_trace(&fixture);

	let first = post_stacktrace(fixture.app(), &lines).await;
	let second = post_stacktrace(fixture.app(), &lines).await;

	assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_trace_is_empty_array() {
	let fixture = Fixture::new().await;

	let results = post_stacktrace(fixture.app(), &[]).await;
	assert_eq!(results, json!([]));
}
