// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// Session wide settings consulted while planning and evaluating a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	/// Compare table and column identifiers without regard to case.
	pub case_insensitive_identifiers: bool,
}

impl SessionConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_case_insensitive_identifiers(mut self, enabled: bool) -> Self {
		self.case_insensitive_identifiers = enabled;
		self
	}

	pub fn identifiers_equal(&self, l: &str, r: &str) -> bool {
		if self.case_insensitive_identifiers {
			l.eq_ignore_ascii_case(r)
		} else {
			l == r
		}
	}
}
