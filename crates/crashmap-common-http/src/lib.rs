// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for crashmap.
//!
//! Every outbound fetch (bundled artifacts, external source maps) goes through
//! a client built here so the User-Agent and timeout are consistent.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
