// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Creates a new HTTP client builder with the standard User-Agent header.
///
/// Use this when you need to customize the client further.
///
/// # Example
/// ```ignore
/// let client = crashmap_common_http::builder()
///     .connect_timeout(Duration::from_secs(2))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a new HTTP client with a request timeout and the standard User-Agent.
pub fn new_client_with_timeout(timeout: Duration) -> reqwest::Result<Client> {
	builder().timeout(timeout).build()
}

/// Returns the standard crashmap User-Agent string.
///
/// Format: `crashmap/{version}`
pub fn user_agent() -> String {
	format!("crashmap/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0], "crashmap");
		assert!(!parts[1].is_empty());
	}

	#[test]
	fn client_with_timeout_builds() {
		let client = new_client_with_timeout(Duration::from_secs(5));
		assert!(client.is_ok());
	}
}
