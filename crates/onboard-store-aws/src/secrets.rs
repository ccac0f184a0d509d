// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secrets Manager backend.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use onboard_common_secret::SecretString;
use onboard_provisioning::{SecretStore, StoreError};

use crate::ACCESS_DENIED_CODE;

#[derive(Debug, Clone)]
pub struct SecretsManagerStore {
	client: aws_sdk_secretsmanager::Client,
}

impl SecretsManagerStore {
	pub fn new(sdk_config: &SdkConfig) -> Self {
		Self::from_client(aws_sdk_secretsmanager::Client::new(sdk_config))
	}

	pub fn from_client(client: aws_sdk_secretsmanager::Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
	fn name(&self) -> &str {
		"secretsmanager"
	}

	async fn get_secret(&self, secret_id: &str) -> Result<SecretString, StoreError> {
		let output = self
			.client
			.get_secret_value()
			.secret_id(secret_id)
			.send()
			.await
			.map_err(|err| {
				let message = DisplayErrorContext(&err).to_string();
				map_get_secret_error(secret_id, err.into_service_error(), message)
			})?;

		let body = output
			.secret_string()
			.ok_or_else(|| StoreError::InvalidValue {
				key: secret_id.to_string(),
				message: "secret has no SecretString".to_string(),
			})?;

		tracing::debug!(
			secret_id = %secret_id,
			version = ?output.version_id(),
			"secret loaded from Secrets Manager"
		);
		Ok(SecretString::new(body.to_string()))
	}
}

fn map_get_secret_error(secret_id: &str, err: GetSecretValueError, message: String) -> StoreError {
	if err.is_resource_not_found_exception() {
		return StoreError::NotFound {
			key: secret_id.to_string(),
		};
	}
	if err.code() == Some(ACCESS_DENIED_CODE) {
		return StoreError::PermissionDenied {
			key: secret_id.to_string(),
			message,
		};
	}
	tracing::warn!(secret_id = %secret_id, error = %message, "Secrets Manager GetSecretValue failed");
	StoreError::Unavailable { message }
}
