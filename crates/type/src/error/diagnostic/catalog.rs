// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Display;

use crate::error::diagnostic::Diagnostic;

pub fn source_not_found(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "CATALOG_001".to_string(),
		statement: None,
		message: format!("table or view '{}' not found", name),
		column: None,
		label: None,
		help: Some("ensure the table or view exists and the name is spelled correctly".to_string()),
		notes: vec![],
		cause: None,
	}
}
