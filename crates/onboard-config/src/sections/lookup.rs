// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning lookup configuration section.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the user name in key templates.
pub const USER_NAME_PLACEHOLDER: &str = "{userName}";
pub const DEFAULT_EMAIL_PARAMETER_TEMPLATE: &str = "/cf-users/{userName}/email";
pub const DEFAULT_PASSWORD_SECRET_ID: &str = "OneTimePassword";

/// How lookup failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
	/// Any lookup or secret parse failure aborts the invocation.
	#[default]
	Strict,
	/// Lookup and secret parse failures are replaced with sentinel values.
	Degraded,
}

/// When the email parameter is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmailLookupMode {
	/// Only when the trigger event carries no email.
	#[default]
	WhenMissing,
	/// On every invocation; the stored value wins over the event's.
	Always,
}

impl fmt::Display for ErrorPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ErrorPolicy::Strict => write!(f, "strict"),
			ErrorPolicy::Degraded => write!(f, "degraded"),
		}
	}
}

impl FromStr for ErrorPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"strict" => Ok(ErrorPolicy::Strict),
			"degraded" => Ok(ErrorPolicy::Degraded),
			other => Err(format!("unknown error policy '{other}'")),
		}
	}
}

impl fmt::Display for EmailLookupMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EmailLookupMode::WhenMissing => write!(f, "when_missing"),
			EmailLookupMode::Always => write!(f, "always"),
		}
	}
}

impl FromStr for EmailLookupMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"when_missing" => Ok(EmailLookupMode::WhenMissing),
			"always" => Ok(EmailLookupMode::Always),
			other => Err(format!("unknown email lookup mode '{other}'")),
		}
	}
}

/// Lookup configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
	pub email_parameter_template: String,
	pub password_secret_id: String,
	pub email_lookup: EmailLookupMode,
	pub error_policy: ErrorPolicy,
	/// Upper bound on the lookup stage. `None` leaves it to the stores' own timeouts.
	pub deadline: Option<Duration>,
}

impl Default for LookupConfig {
	fn default() -> Self {
		Self {
			email_parameter_template: DEFAULT_EMAIL_PARAMETER_TEMPLATE.to_string(),
			password_secret_id: DEFAULT_PASSWORD_SECRET_ID.to_string(),
			email_lookup: EmailLookupMode::default(),
			error_policy: ErrorPolicy::default(),
			deadline: None,
		}
	}
}

/// Lookup configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupConfigLayer {
	#[serde(default)]
	pub email_parameter_template: Option<String>,
	#[serde(default)]
	pub password_secret_id: Option<String>,
	#[serde(default)]
	pub email_lookup: Option<EmailLookupMode>,
	#[serde(default)]
	pub error_policy: Option<ErrorPolicy>,
	#[serde(default)]
	pub deadline_ms: Option<u64>,
}

impl LookupConfigLayer {
	pub fn merge(&mut self, other: LookupConfigLayer) {
		if other.email_parameter_template.is_some() {
			self.email_parameter_template = other.email_parameter_template;
		}
		if other.password_secret_id.is_some() {
			self.password_secret_id = other.password_secret_id;
		}
		if other.email_lookup.is_some() {
			self.email_lookup = other.email_lookup;
		}
		if other.error_policy.is_some() {
			self.error_policy = other.error_policy;
		}
		if other.deadline_ms.is_some() {
			self.deadline_ms = other.deadline_ms;
		}
	}

	pub fn finalize(self) -> LookupConfig {
		LookupConfig {
			email_parameter_template: self
				.email_parameter_template
				.unwrap_or_else(|| DEFAULT_EMAIL_PARAMETER_TEMPLATE.to_string()),
			password_secret_id: self
				.password_secret_id
				.unwrap_or_else(|| DEFAULT_PASSWORD_SECRET_ID.to_string()),
			email_lookup: self.email_lookup.unwrap_or_default(),
			error_policy: self.error_policy.unwrap_or_default(),
			deadline: self.deadline_ms.map(Duration::from_millis),
		}
	}
}
