// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, JoinType, Table, table::JoinedRow};
use quarry_sql::expression::{Expression, Operator};
use quarry_type::Value;
use tracing::debug;

use crate::{
	context::ExecutionContext,
	expression::{Scope, compare, evaluate, is_true},
};

/// `left.column <operator> expression`, where `expression` reads only the
/// right side. When the expression is a plain column and the left side is
/// the larger one, the right side drives the loop with the operator
/// reversed. Either way the result lists left columns first, in left row
/// order.
pub(crate) fn join(
	ctx: &ExecutionContext<'_>,
	left: &Table,
	right: &Table,
	column: &ColumnRef,
	operator: Operator,
	expression: &Expression,
) -> crate::Result<Table> {
	let left_column = left.find_column(column, ctx.config())?;
	let mut right_values = Vec::with_capacity(right.row_count());
	for row in 0..right.row_count() {
		right_values.push(evaluate(
			ctx,
			expression,
			Scope::Row {
				table: right,
				row,
			},
		)?);
	}

	let mut rows: Vec<JoinedRow> = Vec::new();
	if expression.is_column() && left.row_count() > right.row_count() {
		debug!(left = left.row_count(), right = right.row_count(), "join driven by the right side");
		let reversed = operator.reverse();
		for (r, value) in right_values.iter().enumerate() {
			for l in 0..left.row_count() {
				if matches(reversed, value, left.value(l, left_column))? {
					rows.push((Some(l), Some(r)));
				}
			}
		}
		rows.sort_unstable();
	} else {
		for l in 0..left.row_count() {
			let value = left.value(l, left_column);
			for (r, right_value) in right_values.iter().enumerate() {
				if matches(operator, value, right_value)? {
					rows.push((Some(l), Some(r)));
				}
			}
		}
	}
	Ok(Table::join_rows(left, right, &rows))
}

/// Joins on an arbitrary condition and pads the rows of the preserved sides
/// that found no partner.
pub(crate) fn outer(
	ctx: &ExecutionContext<'_>,
	left: &Table,
	right: &Table,
	kind: JoinType,
	on: &Expression,
) -> crate::Result<Table> {
	let product = Table::product(left, right);
	let right_count = right.row_count();
	let keep_left = matches!(kind, JoinType::LeftOuter | JoinType::FullOuter);
	let keep_right = matches!(kind, JoinType::RightOuter | JoinType::FullOuter);

	let mut rows: Vec<JoinedRow> = Vec::new();
	let mut right_matched = vec![false; right_count];
	for l in 0..left.row_count() {
		let mut matched = false;
		for r in 0..right_count {
			let scope = Scope::Row {
				table: &product,
				row: l * right_count + r,
			};
			if is_true(ctx, on, scope)? {
				rows.push((Some(l), Some(r)));
				right_matched[r] = true;
				matched = true;
			}
		}
		if !matched && keep_left {
			rows.push((Some(l), None));
		}
	}
	if keep_right {
		rows.extend(right_matched.iter().enumerate().filter(|(_, matched)| !**matched).map(|(r, _)| (None, Some(r))));
	}
	debug!(%kind, rows = rows.len(), "outer join");
	Ok(Table::join_rows(left, right, &rows))
}

fn matches(operator: Operator, l: &Value, r: &Value) -> crate::Result<bool> {
	Ok(compare(operator, l, r)? == Value::Boolean(true))
}
