// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! New-user notification pipeline.
//!
//! A trigger event announcing a new user account is decoded into a
//! [`ProvisioningRequest`], the user's email and the shared one-time password
//! are looked up from a [`ParameterStore`] and a [`SecretStore`], and a single
//! [`ReportRecord`] is emitted through a [`ReportSink`].
//!
//! ```ignore
//! let pipeline = NotificationPipeline::from_config(&config, parameters, secrets, sink);
//! let message = pipeline.handle(payload).await?;
//! ```

pub mod error;
pub mod event;
pub mod lookup;
pub mod pipeline;
pub mod report;
pub mod result;
pub mod store;

pub use error::{ProvisioningError, Stage, StoreError, StoreKind};
pub use event::{decode, decode_request, EventShape, ProvisioningRequest, TriggerEvent};
pub use lookup::{
	email_parameter_key, ProvisioningLookup, Resolution, PASSWORD_PARSE_FAILED,
	PASSWORD_RETRIEVE_FAILED,
};
pub use pipeline::NotificationPipeline;
pub use report::{
	MemoryReportSink, Outcome, ReportRecord, ReportSink, Reporter, TracingReportSink,
	AUDIT_TARGET, SUCCESS_MESSAGE, TRACE_TARGET,
};
pub use result::{aggregate, ProvisioningResult, ResolvedPassword};
pub use store::{ParameterStore, SecretStore};

pub use onboard_common_secret::SecretString;
pub use onboard_config::{
	EmailLookupMode, ErrorPolicy, LookupConfig, NotifierConfig, PasswordDisclosure, ReportConfig,
};
