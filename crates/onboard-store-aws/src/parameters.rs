// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SSM Parameter Store backend.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use onboard_provisioning::{ParameterStore, StoreError};

use crate::ACCESS_DENIED_CODE;

#[derive(Debug, Clone)]
pub struct SsmParameterStore {
	client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
	pub fn new(sdk_config: &SdkConfig) -> Self {
		Self::from_client(aws_sdk_ssm::Client::new(sdk_config))
	}

	pub fn from_client(client: aws_sdk_ssm::Client) -> Self {
		Self { client }
	}
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
	fn name(&self) -> &str {
		"ssm"
	}

	async fn get_parameter(&self, key: &str) -> Result<String, StoreError> {
		let output = self
			.client
			.get_parameter()
			.name(key)
			.with_decryption(true)
			.send()
			.await
			.map_err(|err| {
				let message = DisplayErrorContext(&err).to_string();
				map_get_parameter_error(key, err.into_service_error(), message)
			})?;

		let value = output
			.parameter()
			.and_then(|parameter| parameter.value())
			.ok_or_else(|| StoreError::InvalidValue {
				key: key.to_string(),
				message: "parameter has no value".to_string(),
			})?;

		tracing::debug!(key = %key, "parameter loaded from SSM");
		Ok(value.to_string())
	}
}

fn map_get_parameter_error(key: &str, err: GetParameterError, message: String) -> StoreError {
	if err.is_parameter_not_found() || err.is_parameter_version_not_found() {
		return StoreError::NotFound {
			key: key.to_string(),
		};
	}
	if err.code() == Some(ACCESS_DENIED_CODE) {
		return StoreError::PermissionDenied {
			key: key.to_string(),
			message,
		};
	}
	tracing::warn!(key = %key, error = %message, "SSM GetParameter failed");
	StoreError::Unavailable { message }
}
