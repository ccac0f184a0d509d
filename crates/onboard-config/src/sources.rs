// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::NotifierConfigLayer;
use crate::sections::{AwsConfigLayer, LoggingConfigLayer, LookupConfigLayer, ReportConfigLayer};

/// Default location of the notifier config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/onboard/notifier.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<NotifierConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<NotifierConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(NotifierConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<NotifierConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(NotifierConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: NotifierConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: ONBOARD_NOTIFIER_<FIELD>
pub struct EnvSource;

impl EnvSource {
	/// Build a layer from an arbitrary variable lookup. Empty values count as unset.
	pub fn load_from<F>(&self, lookup: F) -> Result<NotifierConfigLayer, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let env = Env(lookup);
		Ok(NotifierConfigLayer {
			lookup: Some(LookupConfigLayer {
				email_parameter_template: env.var("ONBOARD_NOTIFIER_EMAIL_PARAMETER_TEMPLATE"),
				password_secret_id: env.var("ONBOARD_NOTIFIER_PASSWORD_SECRET_ID"),
				email_lookup: env.parsed("ONBOARD_NOTIFIER_EMAIL_LOOKUP")?,
				error_policy: env.parsed("ONBOARD_NOTIFIER_ERROR_POLICY")?,
				deadline_ms: env.parsed("ONBOARD_NOTIFIER_DEADLINE_MS")?,
			}),
			report: Some(ReportConfigLayer {
				password_disclosure: env.parsed("ONBOARD_NOTIFIER_PASSWORD_DISCLOSURE")?,
				verbose: env.bool("ONBOARD_NOTIFIER_VERBOSE"),
			}),
			logging: Some(LoggingConfigLayer {
				level: env.var("ONBOARD_NOTIFIER_LOG_LEVEL"),
				format: env.parsed("ONBOARD_NOTIFIER_LOG_FORMAT")?,
			}),
			aws: Some(AwsConfigLayer {
				region: env.var("ONBOARD_NOTIFIER_AWS_REGION"),
				endpoint_url: env.var("ONBOARD_NOTIFIER_AWS_ENDPOINT_URL"),
			}),
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<NotifierConfigLayer, ConfigError> {
		debug!("loading environment variables");
		self.load_from(|name| std::env::var(name).ok())
	}
}

struct Env<F>(F);

impl<F> Env<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn var(&self, name: &str) -> Option<String> {
		(self.0)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parsed<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
	where
		T: FromStr,
		T::Err: Display,
	{
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|e| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid value '{v}': {e}"),
			}),
			None => Ok(None),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sections::{EmailLookupMode, ErrorPolicy, PasswordDisclosure};
	use std::collections::HashMap;
	use std::io::Write;

	fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.lookup.is_none());
		assert!(layer.report.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/notifier.toml");
		let layer = source.load().unwrap();
		assert!(layer.lookup.is_none());
	}

	#[test]
	fn test_toml_source_parses_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[lookup]
email_parameter_template = "/users/{{userName}}/mail"
error_policy = "degraded"
email_lookup = "always"
deadline_ms = 1500

[report]
password_disclosure = "plaintext"
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		let lookup = layer.lookup.unwrap();
		assert_eq!(
			lookup.email_parameter_template.as_deref(),
			Some("/users/{userName}/mail")
		);
		assert_eq!(lookup.error_policy, Some(ErrorPolicy::Degraded));
		assert_eq!(lookup.email_lookup, Some(EmailLookupMode::Always));
		assert_eq!(lookup.deadline_ms, Some(1500));
		assert_eq!(
			layer.report.unwrap().password_disclosure,
			Some(PasswordDisclosure::Plaintext)
		);
	}

	#[test]
	fn test_toml_source_invalid_file_is_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[lookup\nerror_policy = ").unwrap();
		let result = TomlSource::new(file.path()).load();
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}

	#[test]
	fn test_env_source_reads_fields() {
		let layer = EnvSource
			.load_from(env_from(&[
				("ONBOARD_NOTIFIER_ERROR_POLICY", "degraded"),
				("ONBOARD_NOTIFIER_PASSWORD_SECRET_ID", "TeamPassword"),
				("ONBOARD_NOTIFIER_VERBOSE", "1"),
				("ONBOARD_NOTIFIER_AWS_REGION", "us-east-2"),
			]))
			.unwrap();

		let lookup = layer.lookup.unwrap();
		assert_eq!(lookup.error_policy, Some(ErrorPolicy::Degraded));
		assert_eq!(lookup.password_secret_id.as_deref(), Some("TeamPassword"));
		assert_eq!(layer.report.unwrap().verbose, Some(true));
		assert_eq!(layer.aws.unwrap().region.as_deref(), Some("us-east-2"));
	}

	#[test]
	fn test_env_source_empty_values_are_unset() {
		let layer = EnvSource
			.load_from(env_from(&[("ONBOARD_NOTIFIER_PASSWORD_SECRET_ID", "")]))
			.unwrap();
		assert!(layer.lookup.unwrap().password_secret_id.is_none());
	}

	#[test]
	fn test_env_source_rejects_bad_number() {
		let result = EnvSource.load_from(env_from(&[("ONBOARD_NOTIFIER_DEADLINE_MS", "soon")]));
		match result {
			Err(ConfigError::InvalidValue { key, .. }) => {
				assert_eq!(key, "ONBOARD_NOTIFIER_DEADLINE_MS")
			}
			other => panic!("expected InvalidValue, got {other:?}"),
		}
	}

	#[test]
	fn test_env_source_rejects_unknown_policy() {
		let result = EnvSource.load_from(env_from(&[("ONBOARD_NOTIFIER_ERROR_POLICY", "lenient")]));
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}
}
