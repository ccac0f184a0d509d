// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! AWS backends for the notifier's two stores.
//!
//! - [`SsmParameterStore`]: SSM Parameter Store `GetParameter` (with decryption)
//! - [`SecretsManagerStore`]: Secrets Manager `GetSecretValue`
//!
//! Both wrap an SDK client built once from [`load_sdk_config`] and are cheap to
//! share behind an `Arc`.

pub mod parameters;
pub mod secrets;

pub use parameters::SsmParameterStore;
pub use secrets::SecretsManagerStore;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use onboard_config::AwsConfig;

/// Error code AWS returns when IAM denies the call.
pub(crate) const ACCESS_DENIED_CODE: &str = "AccessDeniedException";

/// Resolve SDK configuration from the default provider chain plus overrides.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
	let mut loader = aws_config::defaults(BehaviorVersion::latest());

	if let Some(region) = &config.region {
		loader = loader.region(Region::new(region.clone()));
	}
	if let Some(endpoint_url) = &config.endpoint_url {
		loader = loader.endpoint_url(endpoint_url.clone());
	}

	let sdk_config = loader.load().await;

	tracing::info!(
		region = sdk_config.region().map(|r| r.as_ref()).unwrap_or("unset"),
		endpoint_override = config.endpoint_url.is_some(),
		"AWS SDK configuration loaded"
	);

	sdk_config
}
