// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report configuration section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether the one-time password appears in the audit report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PasswordDisclosure {
	#[default]
	Redacted,
	/// Writes the password in clear text to the log sink. Opt-in only.
	Plaintext,
}

impl fmt::Display for PasswordDisclosure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PasswordDisclosure::Redacted => write!(f, "redacted"),
			PasswordDisclosure::Plaintext => write!(f, "plaintext"),
		}
	}
}

impl FromStr for PasswordDisclosure {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"redacted" => Ok(PasswordDisclosure::Redacted),
			"plaintext" => Ok(PasswordDisclosure::Plaintext),
			other => Err(format!("unknown password disclosure '{other}'")),
		}
	}
}

/// Report configuration (runtime, fully resolved).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportConfig {
	pub password_disclosure: PasswordDisclosure,
	/// Emit one diagnostic trace per pipeline stage.
	pub verbose: bool,
}

/// Report configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfigLayer {
	#[serde(default)]
	pub password_disclosure: Option<PasswordDisclosure>,
	#[serde(default)]
	pub verbose: Option<bool>,
}

impl ReportConfigLayer {
	pub fn merge(&mut self, other: ReportConfigLayer) {
		if other.password_disclosure.is_some() {
			self.password_disclosure = other.password_disclosure;
		}
		if other.verbose.is_some() {
			self.verbose = other.verbose;
		}
	}

	pub fn finalize(self) -> ReportConfig {
		ReportConfig {
			password_disclosure: self.password_disclosure.unwrap_or_default(),
			verbose: self.verbose.unwrap_or(false),
		}
	}
}
