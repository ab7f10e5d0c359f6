// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Display;

use crate::{Type, error::diagnostic::Diagnostic};

pub fn type_mismatch(operator: impl Display, left: Type, right: Type) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_001".to_string(),
		statement: None,
		message: format!("cannot apply '{}' to {} and {}", operator, left, right),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn divide_by_zero() -> Diagnostic {
	Diagnostic {
		code: "ENGINE_002".to_string(),
		statement: None,
		message: "division by zero".to_string(),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn invalid_pattern(pattern: impl Display, reason: impl Display) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_003".to_string(),
		statement: None,
		message: format!("invalid pattern '{}'", pattern),
		column: None,
		label: Some(reason.to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn function_not_found(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_004".to_string(),
		statement: None,
		message: format!("function '{}' not found", name),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn function_arity(name: impl Display, expected: usize, actual: usize) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_005".to_string(),
		statement: None,
		message: format!("function '{}' expects {} argument(s), got {}", name, expected, actual),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn scalar_subquery_cardinality(rows: usize, columns: usize) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_006".to_string(),
		statement: None,
		message: format!(
			"scalar sub-query must return at most one row with one column, got {} row(s) and {} column(s)",
			rows, columns
		),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn quantified_arity(left: usize, right: usize) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_007".to_string(),
		statement: None,
		message: format!("quantified comparison of {} column(s) against a sub-query of {} column(s)", left, right),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn column_not_in_frame(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_008".to_string(),
		statement: None,
		message: format!("column '{}' is not part of the evaluated table", name),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn correlated_out_of_scope(level: usize, name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_009".to_string(),
		statement: None,
		message: format!("correlated reference '{}' at level {} has no enclosing row", name, level),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn storage_failure(table: impl Display, reason: impl Display) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_010".to_string(),
		statement: None,
		message: format!("failed to read '{}'", table),
		column: None,
		label: Some(reason.to_string()),
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn aggregate_outside_group(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "ENGINE_011".to_string(),
		statement: None,
		message: format!("aggregate function '{}' evaluated outside of a group", name),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn unplanned_subquery() -> Diagnostic {
	Diagnostic {
		code: "ENGINE_012".to_string(),
		statement: None,
		message: "sub-query was not compiled before evaluation".to_string(),
		column: None,
		label: None,
		help: Some("compile the statement with the planner first".to_string()),
		notes: vec![],
		cause: None,
	}
}
