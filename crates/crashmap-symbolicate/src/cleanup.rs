// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Path cleanup applied to frame files before their artifact is loaded.
//!
//! Some build integrations emit mangled paths such as
//! `/app/build/route:/app/build/index.js`. The engine carries no built-in
//! knowledge of these; callers supply the rules.

use regex::Regex;

/// Ordered list of patterns removed from a frame path.
#[derive(Debug, Clone, Default)]
pub struct PathCleanup {
	rules: Vec<Regex>,
}

impl PathCleanup {
	/// No rules: paths pass through unchanged.
	pub fn none() -> Self {
		Self::default()
	}

	/// Compile rules from pattern strings.
	pub fn from_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let rules = patterns
			.into_iter()
			.map(|p| Regex::new(p.as_ref()))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { rules })
	}

	/// Apply every rule in order; each removes its first match.
	pub fn apply(&self, path: &str) -> String {
		self.rules
			.iter()
			.fold(path.to_string(), |acc, rule| rule.replace(&acc, "").into_owned())
	}
}
