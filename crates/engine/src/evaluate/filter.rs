// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, Table};
use quarry_sql::expression::{BinaryExpression, Expression, Operator, Quantifier};
use quarry_type::Value;
use tracing::trace;

use crate::{
	context::ExecutionContext,
	evaluate::find_columns,
	expression::{Scope, compare, evaluate, is_true, quantified_match},
};

pub(crate) fn functional(ctx: &ExecutionContext<'_>, child: Table, predicate: &Expression) -> crate::Result<Table> {
	let mut mask = Vec::with_capacity(child.row_count());
	for row in 0..child.row_count() {
		mask.push(is_true(
			ctx,
			predicate,
			Scope::Row {
				table: &child,
				row,
			},
		)?);
	}
	Ok(child.filter(&mask))
}

/// The predicate does not depend on the child rows, so it either keeps all of
/// them or none.
pub(crate) fn constant(ctx: &ExecutionContext<'_>, child: Table, predicate: &Expression) -> crate::Result<Table> {
	let keep = is_true(ctx, predicate, Scope::Empty)?;
	trace!(keep, "constant select");
	if keep {
		Ok(child)
	} else {
		Ok(child.filter(&vec![false; child.row_count()]))
	}
}

pub(crate) fn pattern(ctx: &ExecutionContext<'_>, child: Table, predicate: &Expression) -> crate::Result<Table> {
	match predicate {
		Expression::Binary(BinaryExpression {
			left,
			..
		}) if left.is_constant() => constant(ctx, child, predicate),
		_ => functional(ctx, child, predicate),
	}
}

pub(crate) fn multi_column_equi(
	ctx: &ExecutionContext<'_>,
	child: Table,
	columns: &[ColumnRef],
	values: &[Expression],
) -> crate::Result<Table> {
	let positions = find_columns(ctx, &child, columns)?;
	let values = values.iter().map(|value| evaluate(ctx, value, Scope::Empty)).collect::<crate::Result<Vec<_>>>()?;

	let mut mask = Vec::with_capacity(child.row_count());
	for row in 0..child.row_count() {
		let mut keep = true;
		for (&column, value) in positions.iter().zip(&values) {
			if compare(Operator::Equal, child.value(row, column), value)? != Value::Boolean(true) {
				keep = false;
				break;
			}
		}
		mask.push(keep);
	}
	Ok(child.filter(&mask))
}

/// Keeps the left rows whose `columns` satisfy the quantified comparison
/// against every row of `right`.
pub(crate) fn any_all(
	ctx: &ExecutionContext<'_>,
	left: Table,
	right: &Table,
	columns: &[ColumnRef],
	operator: Operator,
	quantifier: Quantifier,
) -> crate::Result<Table> {
	let positions = find_columns(ctx, &left, columns)?;
	let right_rows: Vec<Vec<Value>> = right.rows().collect();

	let mut mask = Vec::with_capacity(left.row_count());
	for row in 0..left.row_count() {
		let values: Vec<Value> = positions.iter().map(|&column| left.value(row, column).clone()).collect();
		mask.push(quantified_match(&values, operator, quantifier, right.column_count(), right_rows.iter().cloned())?);
	}
	Ok(left.filter(&mask))
}
