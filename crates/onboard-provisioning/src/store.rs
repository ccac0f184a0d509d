// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Contracts for the two backing stores.
//!
//! Implementations are long-lived, read-only handles created once per process
//! and shared across invocations.

use async_trait::async_trait;
use onboard_common_secret::SecretString;

use crate::error::StoreError;

/// Key-value store for low-sensitivity values such as user email addresses.
#[async_trait]
pub trait ParameterStore: Send + Sync {
	fn name(&self) -> &str;

	async fn get_parameter(&self, key: &str) -> Result<String, StoreError>;
}

/// Store for sensitive values. Returns the raw (JSON-encoded) secret body.
#[async_trait]
pub trait SecretStore: Send + Sync {
	fn name(&self) -> &str;

	async fn get_secret(&self, secret_id: &str) -> Result<SecretString, StoreError>;
}
