// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Call-counting store doubles for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use onboard_provisioning::{
	MemoryReportSink, NotificationPipeline, NotifierConfig, ParameterStore, SecretStore,
	SecretString, StoreError,
};
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Default)]
pub struct MockParameterStore {
	values: HashMap<String, String>,
	delay: Option<Duration>,
	calls: AtomicUsize,
	keys: Mutex<Vec<String>>,
}

impl MockParameterStore {
	pub fn with(key: &str, value: &str) -> Self {
		let mut store = Self::default();
		store.values.insert(key.to_string(), value.to_string());
		store
	}

	pub fn empty() -> Self {
		Self::default()
	}

	pub fn delayed(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn requested_keys(&self) -> Vec<String> {
		self.keys.lock().clone()
	}
}

#[async_trait]
impl ParameterStore for MockParameterStore {
	fn name(&self) -> &str {
		"mock-parameters"
	}

	async fn get_parameter(&self, key: &str) -> Result<String, StoreError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.keys.lock().push(key.to_string());
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		self.values
			.get(key)
			.cloned()
			.ok_or_else(|| StoreError::NotFound {
				key: key.to_string(),
			})
	}
}

pub enum SecretResponse {
	Body(String),
	Unavailable,
}

pub struct MockSecretStore {
	response: SecretResponse,
	delay: Option<Duration>,
	calls: AtomicUsize,
}

impl MockSecretStore {
	pub fn body(body: &str) -> Self {
		Self {
			response: SecretResponse::Body(body.to_string()),
			delay: None,
			calls: AtomicUsize::new(0),
		}
	}

	pub fn password(password: &str) -> Self {
		Self::body(&serde_json::json!({ "password": password }).to_string())
	}

	pub fn unavailable() -> Self {
		Self {
			response: SecretResponse::Unavailable,
			delay: None,
			calls: AtomicUsize::new(0),
		}
	}

	pub fn delayed(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SecretStore for MockSecretStore {
	fn name(&self) -> &str {
		"mock-secrets"
	}

	async fn get_secret(&self, _secret_id: &str) -> Result<SecretString, StoreError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		match &self.response {
			SecretResponse::Body(body) => Ok(SecretString::new(body.clone())),
			SecretResponse::Unavailable => Err(StoreError::Unavailable {
				message: "simulated outage".to_string(),
			}),
		}
	}
}

pub struct Harness {
	pub parameters: Arc<MockParameterStore>,
	pub secrets: Arc<MockSecretStore>,
	pub sink: Arc<MemoryReportSink>,
	pub pipeline: NotificationPipeline,
}

impl Harness {
	pub fn new(
		config: &NotifierConfig,
		parameters: MockParameterStore,
		secrets: MockSecretStore,
	) -> Self {
		let parameters = Arc::new(parameters);
		let secrets = Arc::new(secrets);
		let sink = Arc::new(MemoryReportSink::new());
		let pipeline = NotificationPipeline::from_config(
			config,
			parameters.clone(),
			secrets.clone(),
			sink.clone(),
		);
		Self {
			parameters,
			secrets,
			sink,
			pipeline,
		}
	}

	pub fn store_calls(&self) -> usize {
		self.parameters.calls() + self.secrets.calls()
	}
}

/// Collects formatted `tracing` output for assertions.
#[derive(Clone, Default)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
	pub fn lines(&self) -> Vec<String> {
		String::from_utf8_lossy(&self.0.lock())
			.lines()
			.map(str::to_string)
			.collect()
	}
}

impl io::Write for CaptureWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl<'a> MakeWriter<'a> for CaptureWriter {
	type Writer = CaptureWriter;

	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}
