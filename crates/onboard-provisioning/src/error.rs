// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the notification pipeline.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Pipeline stage an error or trace belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
	Decode,
	Lookup,
	Aggregate,
	Report,
}

impl Stage {
	pub fn as_str(&self) -> &'static str {
		match self {
			Stage::Decode => "decode",
			Stage::Lookup => "lookup",
			Stage::Aggregate => "aggregate",
			Stage::Report => "report",
		}
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which backing store a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
	Parameter,
	Secret,
}

impl fmt::Display for StoreKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			StoreKind::Parameter => write!(f, "parameter store"),
			StoreKind::Secret => write!(f, "secret store"),
		}
	}
}

/// Errors returned by a [`ParameterStore`](crate::ParameterStore) or
/// [`SecretStore`](crate::SecretStore).
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("key not found: {key}")]
	NotFound { key: String },

	#[error("store unavailable: {message}")]
	Unavailable { message: String },

	#[error("permission denied for {key}: {message}")]
	PermissionDenied { key: String, message: String },

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },
}

/// Errors that end (or, under the degraded policy, downgrade) an invocation.
#[derive(Debug, Error)]
pub enum ProvisioningError {
	#[error("failed to decode trigger event: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("missing required field: {0}")]
	MissingField(&'static str),

	#[error("{store} lookup of '{key}' failed: {source}")]
	Lookup {
		store: StoreKind,
		key: String,
		#[source]
		source: StoreError,
	},

	#[error("failed to parse secret '{secret_id}': {message}")]
	SecretParse { secret_id: String, message: String },

	#[error("lookup deadline of {deadline_ms}ms exceeded")]
	Timeout { deadline_ms: u64 },
}

impl ProvisioningError {
	/// Stage that produced the error.
	pub fn stage(&self) -> Stage {
		match self {
			ProvisioningError::Decode(_) | ProvisioningError::MissingField(_) => Stage::Decode,
			ProvisioningError::Lookup { .. }
			| ProvisioningError::SecretParse { .. }
			| ProvisioningError::Timeout { .. } => Stage::Lookup,
		}
	}

	/// Whether the degraded policy may replace this error with a sentinel.
	pub fn is_degradable(&self) -> bool {
		matches!(
			self,
			ProvisioningError::Lookup { .. } | ProvisioningError::SecretParse { .. }
		)
	}
}
