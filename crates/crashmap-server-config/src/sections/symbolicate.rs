// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Symbolication endpoint configuration.

use std::path::PathBuf;

use serde::Deserialize;

const DEVELOPMENT: &str = "development";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENCY: usize = 8;
const DEFAULT_STRIP_PATTERN: &str = "^[^:]*route:";

/// Symbolication configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolicateConfig {
	/// Deployment environment; the endpoints only answer in `development`.
	pub environment: String,
	/// Prefix removed from artifact paths in responses.
	pub working_root: PathBuf,
	pub fetch_timeout_secs: u64,
	pub max_concurrency: usize,
	/// Regexes removed from frame files before loading, in order.
	pub strip_path_patterns: Vec<String>,
}

impl SymbolicateConfig {
	pub fn dev_mode(&self) -> bool {
		self.environment == DEVELOPMENT
	}
}

impl Default for SymbolicateConfig {
	fn default() -> Self {
		SymbolicateConfigLayer::default().finalize()
	}
}

/// Symbolication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolicateConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub working_root: Option<PathBuf>,
	#[serde(default)]
	pub fetch_timeout_secs: Option<u64>,
	#[serde(default)]
	pub max_concurrency: Option<usize>,
	#[serde(default)]
	pub strip_path_patterns: Option<Vec<String>>,
}

impl SymbolicateConfigLayer {
	pub fn merge(&mut self, other: SymbolicateConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.working_root.is_some() {
			self.working_root = other.working_root;
		}
		if other.fetch_timeout_secs.is_some() {
			self.fetch_timeout_secs = other.fetch_timeout_secs;
		}
		if other.max_concurrency.is_some() {
			self.max_concurrency = other.max_concurrency;
		}
		if other.strip_path_patterns.is_some() {
			self.strip_path_patterns = other.strip_path_patterns;
		}
	}

	/// Resolve defaults. The working root falls back to the process working
	/// directory at the time of the call.
	pub fn finalize(self) -> SymbolicateConfig {
		let working_root = self
			.working_root
			.or_else(|| std::env::current_dir().ok())
			.unwrap_or_else(|| PathBuf::from("."));

		SymbolicateConfig {
			environment: self.environment.unwrap_or_else(|| DEVELOPMENT.to_string()),
			working_root,
			fetch_timeout_secs: self
				.fetch_timeout_secs
				.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
			max_concurrency: self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
			strip_path_patterns: self
				.strip_path_patterns
				.unwrap_or_else(|| vec![DEFAULT_STRIP_PATTERN.to_string()]),
		}
	}
}
