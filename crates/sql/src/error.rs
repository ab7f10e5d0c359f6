// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{
	Diagnostic, Error, IntoDiagnostic,
	error::diagnostic::{plan, query},
};

/// Structural problems found while compiling a SELECT block.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
	#[error("aggregate function used without a FROM clause")]
	AggregateWithoutFrom,

	#[error("aggregate function in GROUP BY expression {expression}")]
	AggregateInGroupBy {
		expression: String,
	},

	#[error("composite branches differ: {detail}")]
	CompositeShapeMismatch {
		detail: String,
	},

	#[error("{join} requires an ON expression")]
	OuterJoinWithoutOn {
		join: String,
	},

	#[error("sub-query in the select list")]
	SubqueryInSelectList,

	#[error("ORDER BY reference {name} could not be resolved")]
	OrderByNotResolved {
		name: String,
	},

	#[error("GROUP MAX reference {name} could not be resolved")]
	GroupMaxNotResolved {
		name: String,
	},
}

impl IntoDiagnostic for PlanError {
	fn into_diagnostic(self) -> Diagnostic {
		match self {
			PlanError::AggregateWithoutFrom => plan::aggregate_without_from(),
			PlanError::AggregateInGroupBy {
				expression,
			} => plan::aggregate_in_group_by(expression),
			PlanError::CompositeShapeMismatch {
				detail,
			} => plan::composite_shape_mismatch(detail),
			PlanError::OuterJoinWithoutOn {
				join,
			} => plan::outer_join_without_on(join),
			PlanError::SubqueryInSelectList => plan::subquery_in_select_list(),
			PlanError::OrderByNotResolved {
				name,
			} => query::order_by_not_resolved(name),
			PlanError::GroupMaxNotResolved {
				name,
			} => query::group_max_not_resolved(name),
		}
	}
}

impl From<PlanError> for Error {
	fn from(err: PlanError) -> Self {
		Error(err.into_diagnostic())
	}
}
