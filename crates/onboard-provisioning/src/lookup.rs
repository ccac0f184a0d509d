// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolution of the new user's email and the shared one-time password.
//!
//! The two lookups are independent and are issued concurrently. How a failed
//! lookup is treated depends on the configured [`ErrorPolicy`].

use std::sync::Arc;

use onboard_common_secret::SecretString;
use onboard_config::{EmailLookupMode, ErrorPolicy, LookupConfig, USER_NAME_PLACEHOLDER};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ProvisioningError, StoreKind};
use crate::event::ProvisioningRequest;
use crate::result::ResolvedPassword;
use crate::store::{ParameterStore, SecretStore};

/// Sentinel used when the secret store call fails under the degraded policy.
pub const PASSWORD_RETRIEVE_FAILED: &str = "Failed to retrieve password";
/// Sentinel used when the secret body is not `{"password": "..."}` under the degraded policy.
pub const PASSWORD_PARSE_FAILED: &str = "Failed to parse password";

#[derive(Deserialize)]
struct SecretBody {
	password: SecretString,
}

/// Output of the lookup stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
	pub email: String,
	pub password: ResolvedPassword,
}

/// Expand a key template for the given user.
pub fn email_parameter_key(template: &str, user_name: &str) -> String {
	template.replace(USER_NAME_PLACEHOLDER, user_name)
}

pub struct ProvisioningLookup {
	parameters: Arc<dyn ParameterStore>,
	secrets: Arc<dyn SecretStore>,
	email_parameter_template: String,
	password_secret_id: String,
	email_lookup: EmailLookupMode,
	policy: ErrorPolicy,
}

impl ProvisioningLookup {
	pub fn new(
		parameters: Arc<dyn ParameterStore>,
		secrets: Arc<dyn SecretStore>,
		config: &LookupConfig,
	) -> Self {
		Self {
			parameters,
			secrets,
			email_parameter_template: config.email_parameter_template.clone(),
			password_secret_id: config.password_secret_id.clone(),
			email_lookup: config.email_lookup,
			policy: config.error_policy,
		}
	}

	pub fn policy(&self) -> ErrorPolicy {
		self.policy
	}

	/// Resolve email and password for the request.
	///
	/// Under [`ErrorPolicy::Strict`] the first failure is returned. Under
	/// [`ErrorPolicy::Degraded`] a failed email lookup falls back to the email
	/// carried by the event (or an empty string) and a failed password lookup
	/// yields a sentinel.
	pub async fn resolve(
		&self,
		request: &ProvisioningRequest,
	) -> Result<Resolution, ProvisioningError> {
		let email = self.lookup_email(request);
		let password = self.fetch_password();

		match self.policy {
			ErrorPolicy::Strict => {
				let (fetched, password) = tokio::try_join!(email, password)?;
				Ok(Resolution {
					email: fetched
						.or_else(|| request.email.clone())
						.unwrap_or_default(),
					password: ResolvedPassword::Resolved(password),
				})
			}
			ErrorPolicy::Degraded => {
				let (fetched, password) = tokio::join!(email, password);
				let email = match fetched {
					Ok(fetched) => fetched.or_else(|| request.email.clone()),
					Err(e) => {
						warn!(
							user_name = %request.user_name,
							error = %e,
							"email lookup failed, continuing without stored email"
						);
						request.email.clone()
					}
				};
				let password = match password {
					Ok(password) => ResolvedPassword::Resolved(password),
					Err(e) => {
						let sentinel = match &e {
							ProvisioningError::SecretParse { .. } => PASSWORD_PARSE_FAILED,
							_ => PASSWORD_RETRIEVE_FAILED,
						};
						warn!(
							user_name = %request.user_name,
							error = %e,
							sentinel,
							"password lookup failed, reporting sentinel"
						);
						ResolvedPassword::Unavailable(sentinel)
					}
				};
				Ok(Resolution {
					email: email.unwrap_or_default(),
					password,
				})
			}
		}
	}

	/// Returns `None` when the event's own email is used and no call is made.
	async fn lookup_email(
		&self,
		request: &ProvisioningRequest,
	) -> Result<Option<String>, ProvisioningError> {
		if self.email_lookup == EmailLookupMode::WhenMissing && request.email.is_some() {
			debug!(user_name = %request.user_name, "event carries email, skipping parameter lookup");
			return Ok(None);
		}
		self.fetch_email(&request.user_name).await.map(Some)
	}

	async fn fetch_email(&self, user_name: &str) -> Result<String, ProvisioningError> {
		let key = email_parameter_key(&self.email_parameter_template, user_name);
		debug!(store = self.parameters.name(), key = %key, "fetching email parameter");

		self.parameters
			.get_parameter(&key)
			.await
			.map_err(|source| ProvisioningError::Lookup {
				store: StoreKind::Parameter,
				key,
				source,
			})
	}

	async fn fetch_password(&self) -> Result<SecretString, ProvisioningError> {
		let secret_id = &self.password_secret_id;
		debug!(store = self.secrets.name(), secret_id = %secret_id, "fetching one-time password");

		let body = self
			.secrets
			.get_secret(secret_id)
			.await
			.map_err(|source| ProvisioningError::Lookup {
				store: StoreKind::Secret,
				key: secret_id.clone(),
				source,
			})?;

		// serde_json messages can quote the offending input, so only the position is kept.
		let parsed: SecretBody =
			serde_json::from_str(body.expose()).map_err(|e| ProvisioningError::SecretParse {
				secret_id: secret_id.clone(),
				message: format!(
					"{:?} error at line {} column {}",
					e.classify(),
					e.line(),
					e.column()
				),
			})?;

		Ok(parsed.password)
	}
}
