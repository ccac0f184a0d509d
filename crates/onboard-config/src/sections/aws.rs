// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! AWS client configuration section.

use serde::Deserialize;

/// AWS configuration (runtime, fully resolved).
///
/// Unset fields fall through to the SDK's default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsConfig {
	pub region: Option<String>,
	/// Alternate endpoint for both stores, e.g. a local emulator.
	pub endpoint_url: Option<String>,
}

/// AWS configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsConfigLayer {
	#[serde(default)]
	pub region: Option<String>,
	#[serde(default)]
	pub endpoint_url: Option<String>,
}

impl AwsConfigLayer {
	pub fn merge(&mut self, other: AwsConfigLayer) {
		if other.region.is_some() {
			self.region = other.region;
		}
		if other.endpoint_url.is_some() {
			self.endpoint_url = other.endpoint_url;
		}
	}

	pub fn finalize(self) -> AwsConfig {
		AwsConfig {
			region: self.region,
			endpoint_url: self.endpoint_url,
		}
	}
}
