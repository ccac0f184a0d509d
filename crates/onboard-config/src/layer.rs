// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer produced by each source.

use serde::Deserialize;

use crate::sections::{AwsConfigLayer, LoggingConfigLayer, LookupConfigLayer, ReportConfigLayer};

/// One source's view of the configuration. Unset sections stay `None` so that
/// lower-precedence sources are not overwritten.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifierConfigLayer {
	#[serde(default)]
	pub lookup: Option<LookupConfigLayer>,
	#[serde(default)]
	pub report: Option<ReportConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub aws: Option<AwsConfigLayer>,
}

impl NotifierConfigLayer {
	pub fn merge(&mut self, other: NotifierConfigLayer) {
		merge_section(&mut self.lookup, other.lookup, LookupConfigLayer::merge);
		merge_section(&mut self.report, other.report, ReportConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.aws, other.aws, AwsConfigLayer::merge);
	}
}

fn merge_section<T>(slot: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (slot.as_mut(), other) {
		(Some(current), Some(other)) => merge(current, other),
		(None, Some(other)) => *slot = Some(other),
		(_, None) => {}
	}
}
