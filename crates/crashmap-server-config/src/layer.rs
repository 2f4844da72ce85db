// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as produced by a single source.

use serde::Deserialize;

use crate::sections::{HttpConfigLayer, LoggingConfigLayer, SymbolicateConfigLayer};

/// One source's view of the configuration. Absent sections leave lower
/// precedence values untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub symbolicate: Option<SymbolicateConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(
			&mut self.symbolicate,
			other.symbolicate,
			SymbolicateConfigLayer::merge,
		);
	}
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	let Some(other) = other else {
		return;
	};
	match target.take() {
		Some(mut existing) => {
			merge(&mut existing, other);
			*target = Some(existing);
		}
		None => *target = Some(other),
	}
}
