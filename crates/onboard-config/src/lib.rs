// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the onboarding notifier.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`ONBOARD_NOTIFIER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use onboard_config::load_config;
//!
//! let config = load_config()?;
//! println!("secret id: {}", config.lookup.password_secret_id);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::NotifierConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved notifier configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierConfig {
	pub lookup: LookupConfig,
	pub report: ReportConfig,
	pub logging: LoggingConfig,
	pub aws: AwsConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ONBOARD_NOTIFIER_*`)
/// 2. Config file (`/etc/onboard/notifier.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<NotifierConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<NotifierConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<NotifierConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = NotifierConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: NotifierConfigLayer) -> Result<NotifierConfig, ConfigError> {
	let lookup = layer.lookup.unwrap_or_default().finalize();
	let report = layer.report.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let aws = layer.aws.unwrap_or_default().finalize();

	validate_lookup(&lookup)?;

	info!(
		email_parameter_template = %lookup.email_parameter_template,
		password_secret_id = %lookup.password_secret_id,
		email_lookup = %lookup.email_lookup,
		error_policy = %lookup.error_policy,
		deadline_ms = lookup.deadline.map(|d| d.as_millis() as u64),
		password_disclosure = %report.password_disclosure,
		verbose = report.verbose,
		region = aws.region.as_deref().unwrap_or("default"),
		"Notifier configuration loaded"
	);

	Ok(NotifierConfig {
		lookup,
		report,
		logging,
		aws,
	})
}

/// Validate cross-field configuration rules.
fn validate_lookup(lookup: &LookupConfig) -> Result<(), ConfigError> {
	if !lookup
		.email_parameter_template
		.contains(USER_NAME_PLACEHOLDER)
	{
		return Err(ConfigError::Validation(format!(
			"email parameter template '{}' must contain {USER_NAME_PLACEHOLDER}",
			lookup.email_parameter_template
		)));
	}

	if lookup.password_secret_id.trim().is_empty() {
		return Err(ConfigError::Validation(
			"password secret id must not be empty".to_string(),
		));
	}

	if lookup.deadline.is_some_and(|d| d.is_zero()) {
		return Err(ConfigError::Validation(
			"deadline_ms must be greater than zero".to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	struct FixedSource(Precedence, NotifierConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<NotifierConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn lookup_layer(secret_id: &str) -> NotifierConfigLayer {
		NotifierConfigLayer {
			lookup: Some(LookupConfigLayer {
				password_secret_id: Some(secret_id.to_string()),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_defaults_resolve() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, NotifierConfig::default());
	}

	#[test]
	fn test_environment_overrides_file_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource(Precedence::Environment, lookup_layer("FromEnv"))),
			Box::new(FixedSource(Precedence::ConfigFile, lookup_layer("FromFile"))),
		])
		.unwrap();
		assert_eq!(config.lookup.password_secret_id, "FromEnv");
	}

	#[test]
	fn test_template_without_placeholder_rejected() {
		let lookup = LookupConfig {
			email_parameter_template: "/cf-users/static/email".to_string(),
			..Default::default()
		};
		let result = validate_lookup(&lookup);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_empty_secret_id_rejected() {
		let lookup = LookupConfig {
			password_secret_id: "  ".to_string(),
			..Default::default()
		};
		assert!(validate_lookup(&lookup).is_err());
	}

	#[test]
	fn test_zero_deadline_rejected() {
		let lookup = LookupConfig {
			deadline: Some(Duration::ZERO),
			..Default::default()
		};
		let err = validate_lookup(&lookup).unwrap_err();
		assert!(err.to_string().contains("deadline_ms"));
	}
}
