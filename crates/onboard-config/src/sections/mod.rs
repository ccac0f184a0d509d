// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod aws;
mod logging;
mod lookup;
mod report;

pub use aws::{AwsConfig, AwsConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use lookup::{
	EmailLookupMode, ErrorPolicy, LookupConfig, LookupConfigLayer, DEFAULT_EMAIL_PARAMETER_TEMPLATE,
	DEFAULT_PASSWORD_SECRET_ID, USER_NAME_PLACEHOLDER,
};
pub use report::{PasswordDisclosure, ReportConfig, ReportConfigLayer};
