// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Trigger event decoding.
//!
//! Two payload shapes are accepted:
//!
//! - audit-wrapped: `{"detail": {"requestParameters": {"userName": "..."}}}`,
//!   as delivered for a `CreateUser` audit record
//! - flat: `{"userName": "...", "email": "..."}`
//!
//! A payload whose `detail` is an object is held to the audit-wrapped shape;
//! any other object is read as flat.

use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProvisioningError;

/// Canonical record extracted from a trigger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningRequest {
	pub user_name: String,
	/// Email carried by the event itself, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventShape {
	AuditWrapped,
	Flat,
}

#[derive(Debug, Clone)]
pub enum TriggerEvent {
	AuditWrapped(AuditWrappedEvent),
	Flat(FlatEvent),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditWrappedEvent {
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default, rename = "detail-type")]
	pub detail_type: Option<String>,
	pub detail: AuditDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetail {
	#[serde(default)]
	pub event_name: Option<String>,
	#[serde(default)]
	pub request_parameters: Option<RequestParameters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParameters {
	#[serde(default)]
	pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatEvent {
	#[serde(default)]
	pub user_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
}

/// Parse a raw payload into one of the supported event shapes.
pub fn decode(payload: &[u8]) -> Result<TriggerEvent, ProvisioningError> {
	let value: Value = serde_json::from_slice(payload)?;
	if !value.is_object() {
		return Err(serde_json::Error::custom("trigger event must be a JSON object").into());
	}

	let event = if value.get("detail").is_some_and(Value::is_object) {
		TriggerEvent::AuditWrapped(serde_json::from_value(value)?)
	} else {
		TriggerEvent::Flat(serde_json::from_value(value)?)
	};
	Ok(event)
}

/// Decode a payload straight into a [`ProvisioningRequest`].
pub fn decode_request(payload: &[u8]) -> Result<ProvisioningRequest, ProvisioningError> {
	decode(payload)?.into_request()
}

impl TriggerEvent {
	pub fn shape(&self) -> EventShape {
		match self {
			TriggerEvent::AuditWrapped(_) => EventShape::AuditWrapped,
			TriggerEvent::Flat(_) => EventShape::Flat,
		}
	}

	/// Extract the canonical request. Fails if the user name is absent or empty.
	pub fn into_request(self) -> Result<ProvisioningRequest, ProvisioningError> {
		let (user_name, email) = match self {
			TriggerEvent::AuditWrapped(event) => (
				event
					.detail
					.request_parameters
					.and_then(|params| params.user_name),
				None,
			),
			TriggerEvent::Flat(event) => (event.user_name, event.email),
		};

		let user_name = user_name
			.filter(|name| !name.is_empty())
			.ok_or(ProvisioningError::MissingField("userName"))?;

		Ok(ProvisioningRequest {
			user_name,
			email: email.filter(|email| !email.is_empty()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_audit_wrapped_shape() {
		let payload = br#"{"detail":{"requestParameters":{"userName":"alice"}}}"#;
		let event = decode(payload).unwrap();
		assert_eq!(event.shape(), EventShape::AuditWrapped);

		let request = event.into_request().unwrap();
		assert_eq!(request.user_name, "alice");
		assert!(request.email.is_none());
	}

	#[test]
	fn test_audit_wrapped_envelope_metadata() {
		let payload = br#"{
			"source": "aws.iam",
			"detail-type": "AWS API Call via CloudTrail",
			"detail": {
				"eventName": "CreateUser",
				"requestParameters": {"userName": "alice", "path": "/"}
			}
		}"#;
		match decode(payload).unwrap() {
			TriggerEvent::AuditWrapped(event) => {
				assert_eq!(event.source.as_deref(), Some("aws.iam"));
				assert_eq!(
					event.detail_type.as_deref(),
					Some("AWS API Call via CloudTrail")
				);
				assert_eq!(event.detail.event_name.as_deref(), Some("CreateUser"));
			}
			other => panic!("expected audit-wrapped event, got {other:?}"),
		}
	}

	#[test]
	fn test_flat_shape_with_email() {
		let payload = br#"{"userName":"bob","email":"bob@example.com"}"#;
		let event = decode(payload).unwrap();
		assert_eq!(event.shape(), EventShape::Flat);

		let request = event.into_request().unwrap();
		assert_eq!(request.user_name, "bob");
		assert_eq!(request.email.as_deref(), Some("bob@example.com"));
	}

	#[test]
	fn test_flat_empty_email_is_absent() {
		let request = decode_request(br#"{"userName":"bob","email":""}"#).unwrap();
		assert!(request.email.is_none());
	}

	#[test]
	fn test_user_name_kept_verbatim() {
		let request = decode_request(br#"{"detail":{"requestParameters":{"userName":" alice "}}}"#)
			.unwrap();
		assert_eq!(request.user_name, " alice ");
	}

	#[test]
	fn test_non_object_detail_falls_back_to_flat() {
		let request = decode_request(br#"{"detail":"opaque","userName":"carol"}"#).unwrap();
		assert_eq!(request.user_name, "carol");
	}

	#[test]
	fn test_empty_object_is_missing_field() {
		let err = decode_request(b"{}").unwrap_err();
		assert!(matches!(err, ProvisioningError::MissingField("userName")));
	}

	#[test]
	fn test_audit_wrapped_without_user_is_missing_field() {
		for payload in [
			&br#"{"detail":{}}"#[..],
			br#"{"detail":{"requestParameters":null}}"#,
			br#"{"detail":{"requestParameters":{"userName":""}}}"#,
		] {
			let err = decode_request(payload).unwrap_err();
			assert!(matches!(err, ProvisioningError::MissingField(_)));
		}
	}

	#[test]
	fn test_malformed_json_is_decode_error() {
		let err = decode_request(br#"{"detail": {"#).unwrap_err();
		assert!(matches!(err, ProvisioningError::Decode(_)));
	}

	#[test]
	fn test_non_object_payload_is_decode_error() {
		for payload in [&b"[1,2,3]"[..], b"[]", b"\"alice\"", b"42", b"null"] {
			let err = decode_request(payload).unwrap_err();
			assert!(
				matches!(err, ProvisioningError::Decode(_)),
				"payload {:?} gave {err:?}",
				String::from_utf8_lossy(payload)
			);
		}
	}

	#[test]
	fn test_mistyped_user_name_is_decode_error() {
		let err = decode_request(br#"{"userName": 42}"#).unwrap_err();
		assert!(matches!(err, ProvisioningError::Decode(_)));
	}

	#[test]
	fn test_mistyped_audit_wrapped_is_decode_error() {
		for payload in [
			&br#"{"detail":{"requestParameters":{"userName":42}}}"#[..],
			br#"{"detail":{"requestParameters":{"userName":["alice"]}}}"#,
			br#"{"detail":{"requestParameters":"alice"}}"#,
			br#"{"detail":{"requestParameters":{"userName":42}},"userName":"alice"}"#,
		] {
			let err = decode_request(payload).unwrap_err();
			assert!(
				matches!(err, ProvisioningError::Decode(_)),
				"payload {:?} gave {err:?}",
				String::from_utf8_lossy(payload)
			);
		}
	}

	proptest! {
		#[test]
		fn audit_wrapped_keeps_user_name(user in "[a-zA-Z0-9._@+=,-]{1,64}") {
			let payload = serde_json::json!({
				"detail": {"requestParameters": {"userName": user}}
			});
			let bytes = serde_json::to_vec(&payload).unwrap();
			let request = decode_request(&bytes).unwrap();
			prop_assert_eq!(request.user_name, user);
		}

		#[test]
		fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
			let _ = decode_request(&bytes);
		}
	}
}
