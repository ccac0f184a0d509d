// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Aggregation of identity and credential into a single result.

use onboard_common_secret::{SecretString, REDACTED};
use onboard_config::PasswordDisclosure;

/// Password as seen by the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPassword {
	Resolved(SecretString),
	/// Lookup failed under the degraded policy; holds the sentinel text.
	Unavailable(&'static str),
}

impl ResolvedPassword {
	pub fn is_resolved(&self) -> bool {
		matches!(self, ResolvedPassword::Resolved(_))
	}

	/// Text written to the report. Sentinels are never redacted.
	pub fn for_report(&self, disclosure: PasswordDisclosure) -> &str {
		match (self, disclosure) {
			(ResolvedPassword::Resolved(password), PasswordDisclosure::Plaintext) => {
				password.expose().as_str()
			}
			(ResolvedPassword::Resolved(_), PasswordDisclosure::Redacted) => REDACTED,
			(ResolvedPassword::Unavailable(sentinel), _) => *sentinel,
		}
	}
}

/// Everything the report needs about one newly created user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningResult {
	pub user_name: String,
	pub email: String,
	pub password: ResolvedPassword,
}

pub fn aggregate(user_name: String, email: String, password: ResolvedPassword) -> ProvisioningResult {
	ProvisioningResult {
		user_name,
		email,
		password,
	}
}
