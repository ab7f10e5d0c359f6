// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Display;

use crate::error::diagnostic::Diagnostic;

pub fn aggregate_without_from() -> Diagnostic {
	Diagnostic {
		code: "PLAN_001".to_string(),
		statement: None,
		message: "invalid use of aggregate function in select with no FROM clause".to_string(),
		column: None,
		label: None,
		help: Some("aggregate functions need rows to aggregate over".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn aggregate_in_group_by(expression: impl Display) -> Diagnostic {
	Diagnostic {
		code: "PLAN_002".to_string(),
		statement: None,
		message: format!("aggregate expression '{}' is not allowed in GROUP BY clause", expression),
		column: None,
		label: None,
		help: Some("group by plain columns or scalar expressions".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn composite_shape_mismatch(detail: impl Display) -> Diagnostic {
	Diagnostic {
		code: "PLAN_003".to_string(),
		statement: None,
		message: format!("branches of a set operation are incompatible: {}", detail),
		column: None,
		label: None,
		help: Some("both sides of UNION, INTERSECT and EXCEPT must select the same number of columns with compatible types".to_string()),
		notes: vec![],
		cause: None,
	}
}

pub fn outer_join_without_on(join: impl Display) -> Diagnostic {
	Diagnostic {
		code: "PLAN_004".to_string(),
		statement: None,
		message: format!("{} requires an ON expression", join),
		column: None,
		label: None,
		help: None,
		notes: vec![],
		cause: None,
	}
}

pub fn subquery_in_select_list() -> Diagnostic {
	Diagnostic {
		code: "PLAN_005".to_string(),
		statement: None,
		message: "sub-query not allowed in column list".to_string(),
		column: None,
		label: None,
		help: Some("move the sub-query into the FROM or WHERE clause".to_string()),
		notes: vec![],
		cause: None,
	}
}
