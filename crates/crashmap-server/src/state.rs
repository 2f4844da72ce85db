// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::Duration;

use crashmap_server_config::SymbolicateConfig;
use crashmap_symbolicate::{ArtifactLoader, ArtifactSource, PathCleanup, SymbolicationService};

use crate::error::StartupError;

/// Symbolication service over any artifact source.
pub type DynSymbolicationService = SymbolicationService<dyn ArtifactSource>;

/// Shared state for the symbolication routes.
#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DynSymbolicationService>,
	pub config: Arc<SymbolicateConfig>,
}

impl AppState {
	pub fn new(service: Arc<DynSymbolicationService>, config: SymbolicateConfig) -> Self {
		Self {
			service,
			config: Arc::new(config),
		}
	}

	/// Build the HTTP-backed service described by `config`.
	pub fn from_config(config: SymbolicateConfig) -> Result<Self, StartupError> {
		let service = build_service(&config)?;
		Ok(Self::new(Arc::new(service), config))
	}

	/// Prefix stripped from artifact paths in responses.
	pub fn root(&self) -> String {
		self.config.working_root.to_string_lossy().into_owned()
	}
}

/// Create a symbolication service that loads artifacts from disk and HTTP.
pub fn build_service(config: &SymbolicateConfig) -> Result<DynSymbolicationService, StartupError> {
	let client =
		crashmap_common_http::new_client_with_timeout(Duration::from_secs(config.fetch_timeout_secs))?;
	let cleanup = PathCleanup::from_patterns(&config.strip_path_patterns)?;
	let source: Arc<dyn ArtifactSource> = Arc::new(ArtifactLoader::new(client));

	Ok(SymbolicationService::new(source)
		.with_cleanup(cleanup)
		.with_max_concurrency(config.max_concurrency))
}
