// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loading bundled artifacts from disk or over HTTP.

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crashmap_core::ArtifactContent;

use crate::error::{FetchError, Result, SymbolicateError};

static REMOTE_SCHEME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Where artifact and source map text comes from.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
	/// Load the text at a filesystem path or URL.
	async fn load(&self, location: &str) -> Result<ArtifactContent>;
}

/// Returns true when `location` should be fetched over HTTP.
pub fn is_remote(location: &str) -> bool {
	REMOTE_SCHEME.is_match(location)
}

/// Loads artifacts with `reqwest` for `http(s)://` locations and from the
/// local filesystem otherwise.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
	client: Client,
}

impl ArtifactLoader {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn fetch_remote(&self, location: &str) -> std::result::Result<ArtifactContent, FetchError> {
		let url = Url::parse(location)?;
		let text = self
			.client
			.get(url.clone())
			.send()
			.await?
			.error_for_status()?
			.text()
			.await?;

		Ok(ArtifactContent::remote(text, url))
	}

	async fn read_local(&self, location: &str) -> std::result::Result<ArtifactContent, FetchError> {
		let path = local_path(location)?;
		let text = tokio::fs::read_to_string(&path).await?;
		Ok(ArtifactContent::local(text, path))
	}
}

fn local_path(location: &str) -> std::result::Result<PathBuf, FetchError> {
	if location.starts_with("file://") {
		let url = Url::parse(location)?;
		return url
			.to_file_path()
			.map_err(|_| FetchError::NotAFilePath(location.to_string()));
	}
	Ok(PathBuf::from(location))
}

#[async_trait]
impl ArtifactSource for ArtifactLoader {
	#[instrument(skip(self))]
	async fn load(&self, location: &str) -> Result<ArtifactContent> {
		let loaded = if is_remote(location) {
			self.fetch_remote(location).await
		} else {
			self.read_local(location).await
		};

		match loaded {
			Ok(content) => {
				debug!(bytes = content.source_text.len(), "loaded artifact");
				Ok(content)
			}
			Err(e) => Err(SymbolicateError::unavailable(location, e)),
		}
	}
}
