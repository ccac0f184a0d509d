// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading trigger payloads for the invoker.

use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncReadExt;

/// Read the whole payload from `path`, or from stdin when `path` is `None` or `-`.
pub async fn read_payload(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
	match path {
		Some(path) if path != Path::new("-") => tokio::fs::read(path)
			.await
			.with_context(|| format!("failed to read event file {}", path.display())),
		_ => {
			let mut buf = Vec::new();
			tokio::io::stdin()
				.read_to_end(&mut buf)
				.await
				.context("failed to read event from stdin")?;
			Ok(buf)
		}
	}
}

/// Split newline-delimited payloads, skipping blank lines.
pub fn split_batch(payload: &[u8]) -> Vec<&[u8]> {
	payload
		.split(|b| *b == b'\n')
		.map(<[u8]>::trim_ascii)
		.filter(|line| !line.is_empty())
		.collect()
}
