// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Onboarding notifier binary.
//!
//! Reads one trigger event (or a newline-delimited batch) and runs it through
//! the notification pipeline against AWS Parameter Store and Secrets Manager.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use onboard_config::{
	ConfigSource, DefaultsSource, EnvSource, LogFormat, LoggingConfig, NotifierConfig,
	PasswordDisclosure, TomlSource,
};
use onboard_provisioning::{NotificationPipeline, TracingReportSink};
use onboard_store_aws::{SecretsManagerStore, SsmParameterStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod input;

/// Onboarding notifier - logs new user details from a creation event.
#[derive(Parser, Debug)]
#[command(
	name = "onboard-notifier",
	about = "Logs onboarding details when a new user account is created",
	version
)]
struct Args {
	/// Config file to load instead of /etc/onboard/notifier.toml
	#[arg(long, env = "ONBOARD_NOTIFIER_CONFIG")]
	config: Option<PathBuf>,

	/// Event file to process; `-` or absent reads stdin
	#[arg(long)]
	event: Option<PathBuf>,

	/// Treat the input as newline-delimited events
	#[arg(long)]
	batch: bool,

	/// Bound the lookup stage of each invocation, in milliseconds
	#[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
	deadline_ms: Option<u64>,

	/// Emit per-stage traces
	#[arg(long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = load(&args)?;
	init_tracing(&config.logging);

	tracing::info!(
		secret_id = %config.lookup.password_secret_id,
		policy = %config.lookup.error_policy,
		batch = args.batch,
		"starting onboard-notifier"
	);
	if config.report.password_disclosure == PasswordDisclosure::Plaintext {
		tracing::warn!("password_disclosure=plaintext: one-time passwords will be written to the audit log");
	}

	// Store clients are process-scoped and shared by every invocation.
	let sdk_config = onboard_store_aws::load_sdk_config(&config.aws).await;
	let pipeline = NotificationPipeline::from_config(
		&config,
		Arc::new(SsmParameterStore::new(&sdk_config)),
		Arc::new(SecretsManagerStore::new(&sdk_config)),
		Arc::new(TracingReportSink),
	);

	let payload = input::read_payload(args.event.as_deref()).await?;
	let events = if args.batch {
		input::split_batch(&payload)
	} else {
		vec![payload.as_slice()]
	};

	let mut failed = 0usize;
	for event in &events {
		match pipeline.handle(event).await {
			Ok(message) => println!("{message}"),
			Err(e) => {
				tracing::debug!(error = %e, "invocation failed");
				failed += 1;
			}
		}
	}

	if failed > 0 {
		tracing::error!(failed, total = events.len(), "notification failed");
		return Ok(ExitCode::FAILURE);
	}
	Ok(ExitCode::SUCCESS)
}

/// Resolve configuration, then apply command-line overrides.
fn load(args: &Args) -> anyhow::Result<NotifierConfig> {
	let file = match &args.config {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};
	resolve(
		args,
		vec![Box::new(DefaultsSource), Box::new(file), Box::new(EnvSource)],
	)
}

fn resolve(args: &Args, sources: Vec<Box<dyn ConfigSource>>) -> anyhow::Result<NotifierConfig> {
	let mut config =
		onboard_config::load_from_sources(sources).context("failed to load configuration")?;

	if args.verbose {
		config.report.verbose = true;
	}
	if let Some(ms) = args.deadline_ms {
		config.lookup.deadline = Some(Duration::from_millis(ms));
	}
	Ok(config)
}

/// Logs go to stderr so stdout carries only invocation results.
fn init_tracing(logging: &LoggingConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| logging.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	match logging.format {
		LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			)
			.init(),
		LogFormat::Pretty => registry
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.init(),
	}
}
