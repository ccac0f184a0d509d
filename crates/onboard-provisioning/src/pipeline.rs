// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end handling of one trigger event.
//!
//! decode → lookup → aggregate → report, strictly in that order. Only the
//! lookup stage suspends, and only it is bounded by the deadline.

use std::sync::Arc;
use std::time::Duration;

use onboard_config::NotifierConfig;
use tracing::{info, instrument, Span};

use crate::error::ProvisioningError;
use crate::event::{self, ProvisioningRequest};
use crate::lookup::{ProvisioningLookup, Resolution};
use crate::report::{ReportSink, Reporter};
use crate::result::aggregate;
use crate::store::{ParameterStore, SecretStore};

pub struct NotificationPipeline {
	lookup: ProvisioningLookup,
	reporter: Reporter,
	deadline: Option<Duration>,
}

impl NotificationPipeline {
	pub fn new(lookup: ProvisioningLookup, reporter: Reporter) -> Self {
		Self {
			lookup,
			reporter,
			deadline: None,
		}
	}

	/// Wire a pipeline from resolved configuration and process-scoped store handles.
	pub fn from_config(
		config: &NotifierConfig,
		parameters: Arc<dyn ParameterStore>,
		secrets: Arc<dyn SecretStore>,
		sink: Arc<dyn ReportSink>,
	) -> Self {
		let lookup = ProvisioningLookup::new(parameters, secrets, &config.lookup);
		let reporter = Reporter::new(sink, &config.report);
		Self::new(lookup, reporter).with_deadline(config.lookup.deadline)
	}

	pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
		self.deadline = deadline;
		self
	}

	/// Handle one payload using the configured deadline.
	pub async fn handle(&self, payload: &[u8]) -> Result<&'static str, ProvisioningError> {
		self.handle_with_deadline(payload, self.deadline).await
	}

	/// Handle one payload with a caller-supplied deadline for the lookup stage.
	///
	/// Returns the success message once the report is written. Every failure
	/// is reported before it is returned.
	#[instrument(skip_all, fields(user_name = tracing::field::Empty, policy = %self.lookup.policy()))]
	pub async fn handle_with_deadline(
		&self,
		payload: &[u8],
		deadline: Option<Duration>,
	) -> Result<&'static str, ProvisioningError> {
		let request = self.decode(payload).inspect_err(|e| {
			self.reporter.report_failure(None, e);
		})?;

		Span::current().record("user_name", request.user_name.as_str());
		info!(user_name = %request.user_name, "Processing user");

		let resolution = self
			.resolve(&request, deadline)
			.await
			.inspect_err(|e| {
				self.reporter.report_failure(Some(&request.user_name), e);
			})?;
		self.reporter.trace_lookup(&resolution);

		let result = aggregate(request.user_name, resolution.email, resolution.password);
		self.reporter.trace_aggregate(&result);

		Ok(self.reporter.report_success(&result))
	}

	fn decode(&self, payload: &[u8]) -> Result<ProvisioningRequest, ProvisioningError> {
		let request = event::decode_request(payload);
		self.reporter.trace_decode(payload, request.as_ref().ok());
		request
	}

	async fn resolve(
		&self,
		request: &ProvisioningRequest,
		deadline: Option<Duration>,
	) -> Result<Resolution, ProvisioningError> {
		match deadline {
			Some(deadline) => tokio::time::timeout(deadline, self.lookup.resolve(request))
				.await
				.map_err(|_| ProvisioningError::Timeout {
					deadline_ms: deadline.as_millis() as u64,
				})?,
			None => self.lookup.resolve(request).await,
		}
	}
}
