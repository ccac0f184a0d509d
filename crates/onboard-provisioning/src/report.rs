// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Terminal reporting of an invocation.
//!
//! Every invocation produces exactly one [`ReportRecord`]: a success record
//! with the user's details, or a failure record naming the failing stage.
//! Records are handed to a [`ReportSink`]; the default sink writes them as
//! structured `tracing` events on the [`AUDIT_TARGET`] target.

use std::sync::Arc;

use onboard_config::{PasswordDisclosure, ReportConfig};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{ProvisioningError, Stage};
use crate::event::ProvisioningRequest;
use crate::lookup::Resolution;
use crate::result::ProvisioningResult;

/// Returned to the invoker when the report was written.
pub const SUCCESS_MESSAGE: &str = "User creation logged successfully";
/// `tracing` target for report records.
pub const AUDIT_TARGET: &str = "onboard_audit";
/// `tracing` target for verbose per-stage traces.
pub const TRACE_TARGET: &str = "onboard_trace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
	Success,
	Failure,
}

/// One audit record. Holds no timestamps, so identical inputs serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
	pub outcome: Outcome,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stage: Option<Stage>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ReportRecord {
	pub fn success(result: &ProvisioningResult, disclosure: PasswordDisclosure) -> Self {
		Self {
			outcome: Outcome::Success,
			user_name: Some(result.user_name.clone()),
			email: Some(result.email.clone()),
			password: Some(result.password.for_report(disclosure).to_string()),
			stage: None,
			error: None,
		}
	}

	pub fn failure(user_name: Option<&str>, error: &ProvisioningError) -> Self {
		Self {
			outcome: Outcome::Failure,
			user_name: user_name.map(str::to_string),
			email: None,
			password: None,
			stage: Some(error.stage()),
			error: Some(error.to_string()),
		}
	}

	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}
}

/// Destination for report records.
pub trait ReportSink: Send + Sync {
	fn name(&self) -> &str;

	fn emit(&self, record: &ReportRecord);
}

/// Writes records as structured `tracing` events.
#[derive(Debug, Clone, Default)]
pub struct TracingReportSink;

impl ReportSink for TracingReportSink {
	fn name(&self) -> &str {
		"tracing"
	}

	fn emit(&self, record: &ReportRecord) {
		match record.outcome {
			Outcome::Success => info!(
				target: AUDIT_TARGET,
				user_name = record.user_name.as_deref(),
				email = record.email.as_deref(),
				password = record.password.as_deref(),
				"New user created"
			),
			Outcome::Failure => error!(
				target: AUDIT_TARGET,
				stage = record.stage.map(|s| s.as_str()),
				user_name = record.user_name.as_deref(),
				error = record.error.as_deref(),
				"New user notification failed"
			),
		}
	}
}

/// Keeps records in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryReportSink {
	records: Mutex<Vec<ReportRecord>>,
}

impl MemoryReportSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn records(&self) -> Vec<ReportRecord> {
		self.records.lock().clone()
	}
}

impl ReportSink for MemoryReportSink {
	fn name(&self) -> &str {
		"memory"
	}

	fn emit(&self, record: &ReportRecord) {
		self.records.lock().push(record.clone());
	}
}

/// Builds report records, hands them to the sink and emits verbose traces.
pub struct Reporter {
	sink: Arc<dyn ReportSink>,
	disclosure: PasswordDisclosure,
	verbose: bool,
}

impl Reporter {
	pub fn new(sink: Arc<dyn ReportSink>, config: &ReportConfig) -> Self {
		Self {
			sink,
			disclosure: config.password_disclosure,
			verbose: config.verbose,
		}
	}

	pub fn report_success(&self, result: &ProvisioningResult) -> &'static str {
		let record = ReportRecord::success(result, self.disclosure);
		self.sink.emit(&record);
		self.trace_report(&record);
		SUCCESS_MESSAGE
	}

	pub fn report_failure(&self, user_name: Option<&str>, error: &ProvisioningError) {
		let record = ReportRecord::failure(user_name, error);
		self.sink.emit(&record);
		self.trace_report(&record);
	}

	/// Trace the raw payload and, if decoding succeeded, the decoded request.
	pub fn trace_decode(&self, payload: &[u8], request: Option<&ProvisioningRequest>) {
		if !self.verbose {
			return;
		}
		info!(
			target: TRACE_TARGET,
			stage = Stage::Decode.as_str(),
			payload = %String::from_utf8_lossy(payload),
			user_name = request.map(|r| r.user_name.as_str()),
			event_email = request.and_then(|r| r.email.as_deref()),
			decoded = request.is_some(),
			"stage trace"
		);
	}

	pub fn trace_lookup(&self, resolution: &Resolution) {
		if !self.verbose {
			return;
		}
		info!(
			target: TRACE_TARGET,
			stage = Stage::Lookup.as_str(),
			email = %resolution.email,
			password_resolved = resolution.password.is_resolved(),
			"stage trace"
		);
	}

	pub fn trace_aggregate(&self, result: &ProvisioningResult) {
		if !self.verbose {
			return;
		}
		info!(
			target: TRACE_TARGET,
			stage = Stage::Aggregate.as_str(),
			user_name = %result.user_name,
			email = %result.email,
			"stage trace"
		);
	}

	fn trace_report(&self, record: &ReportRecord) {
		if !self.verbose {
			return;
		}
		info!(
			target: TRACE_TARGET,
			stage = Stage::Report.as_str(),
			sink = self.sink.name(),
			outcome = ?record.outcome,
			"stage trace"
		);
	}
}
