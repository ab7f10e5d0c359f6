// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Display;

use crate::error::diagnostic::Diagnostic;

pub fn column_not_found(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "QUERY_001".to_string(),
		statement: None,
		message: format!("column '{}' not found", name),
		column: None,
		label: Some("this column does not exist in any source of the current query".to_string()),
		help: Some("check for typos or ensure the column is exposed by a table in the FROM clause".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn ambiguous_column(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "QUERY_002".to_string(),
		statement: None,
		message: format!("column reference '{}' is ambiguous", name),
		column: None,
		label: Some("more than one source exposes a column with this name".to_string()),
		help: Some("qualify the column with its table name or alias".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn order_by_not_resolved(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "QUERY_003".to_string(),
		statement: None,
		message: format!("can not resolve ORDER BY reference '{}'", name),
		column: None,
		label: None,
		help: Some("order by a selected column, an alias, a column position or an expression".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn group_max_not_resolved(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "QUERY_004".to_string(),
		statement: None,
		message: format!("can not resolve GROUP MAX reference '{}'", name),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn glob_source_not_found(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "QUERY_005".to_string(),
		statement: None,
		message: format!("'{}.*' does not name a source in the FROM clause", name),
		column: None,
		label: None,
		help: Some("use the table name or alias given in the FROM clause".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn duplicate_source(name: impl Display) -> Diagnostic {
	Diagnostic {
		code: "QUERY_006".to_string(),
		statement: None,
		message: format!("source '{}' appears more than once in the FROM clause", name),
		column: None,
		label: None,
		help: Some("give each occurrence a distinct alias".to_string()),
		notes: vec![],
		cause: None,
	}
}
