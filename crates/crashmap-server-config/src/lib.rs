// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the crashmap server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`CRASHMAP_*`)
//!
//! # Usage
//!
//! ```ignore
//! use crashmap_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use regex::Regex;
use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub symbolicate: SymbolicateConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CRASHMAP_*`)
/// 2. Config file (`/etc/crashmap/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize a merged configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let symbolicate = layer.symbolicate.unwrap_or_default().finalize();

	validate_symbolicate(&symbolicate)?;

	info!(
		host = %http.host,
		port = http.port,
		environment = %symbolicate.environment,
		dev_mode = symbolicate.dev_mode(),
		working_root = %symbolicate.working_root.display(),
		max_concurrency = symbolicate.max_concurrency,
		strip_patterns = symbolicate.strip_path_patterns.len(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		symbolicate,
	})
}

/// Validate cross-field configuration rules.
fn validate_symbolicate(config: &SymbolicateConfig) -> Result<(), ConfigError> {
	if config.max_concurrency == 0 {
		return Err(ConfigError::Validation(
			"CRASHMAP_MAX_CONCURRENCY must be at least 1".to_string(),
		));
	}

	if config.fetch_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"CRASHMAP_FETCH_TIMEOUT_SECS must be at least 1".to_string(),
		));
	}

	for pattern in &config.strip_path_patterns {
		Regex::new(pattern).map_err(|e| {
			ConfigError::Validation(format!("invalid strip path pattern '{pattern}': {e}"))
		})?;
	}

	Ok(())
}
