// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bundled artifact content.

use std::path::{Path, PathBuf};

use url::Url;

/// Where an artifact was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOrigin {
	/// Read from the local filesystem.
	Local(PathBuf),
	/// Fetched over HTTP(S).
	Remote(Url),
}

/// Text of a bundled file together with its origin.
///
/// The origin is needed to resolve an external `sourceMappingURL` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactContent {
	pub source_text: String,
	pub origin: ArtifactOrigin,
}

impl ArtifactContent {
	pub fn local(source_text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
		Self {
			source_text: source_text.into(),
			origin: ArtifactOrigin::Local(path.into()),
		}
	}

	pub fn remote(source_text: impl Into<String>, url: Url) -> Self {
		Self {
			source_text: source_text.into(),
			origin: ArtifactOrigin::Remote(url),
		}
	}

	/// The URL the artifact was fetched from, if it was fetched remotely.
	pub fn origin_url(&self) -> Option<&Url> {
		match &self.origin {
			ArtifactOrigin::Remote(url) => Some(url),
			ArtifactOrigin::Local(_) => None,
		}
	}

	/// The filesystem path the artifact was read from, if it was local.
	pub fn local_path(&self) -> Option<&Path> {
		match &self.origin {
			ArtifactOrigin::Local(path) => Some(path),
			ArtifactOrigin::Remote(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn remote_artifact_keeps_origin_url() {
		let url = Url::parse("https://cdn.example.com/dist/app.js").unwrap();
		let artifact = ArtifactContent::remote("var a;", url.clone());

		assert_eq!(artifact.origin_url(), Some(&url));
		assert!(artifact.local_path().is_none());
	}

	#[test]
	fn local_artifact_has_no_origin_url() {
		let artifact = ArtifactContent::local("var a;", "/app/build/index.js");

		assert!(artifact.origin_url().is_none());
		assert_eq!(
			artifact.local_path(),
			Some(Path::new("/app/build/index.js"))
		);
	}
}
