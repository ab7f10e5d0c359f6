// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, SortDirection, Table, TableColumn, TableName};
use quarry_sql::plan::FunctionColumn;

use crate::{
	context::ExecutionContext,
	evaluate::find_columns,
	expression::{Scope, evaluate},
};

/// Appends the function columns one by one; a function may read the columns
/// appended before it.
pub(crate) fn functions(ctx: &ExecutionContext<'_>, child: Table, functions: &[FunctionColumn]) -> crate::Result<Table> {
	let mut table = child;
	for function in functions {
		let mut data = Vec::with_capacity(table.row_count());
		for row in 0..table.row_count() {
			data.push(evaluate(
				ctx,
				&function.expression,
				Scope::Row {
					table: &table,
					row,
				},
			)?);
		}
		table = table.with_column(TableColumn::new(function.name.clone(), data));
	}
	Ok(table)
}

pub(crate) fn sort(
	ctx: &ExecutionContext<'_>,
	child: Table,
	columns: &[ColumnRef],
	directions: &[SortDirection],
) -> crate::Result<Table> {
	let keys: Vec<(usize, SortDirection)> =
		find_columns(ctx, &child, columns)?.into_iter().zip(directions.iter().copied()).collect();
	let rows = child.order_by(&keys);
	Ok(child.select_rows(&rows))
}

pub(crate) fn distinct(ctx: &ExecutionContext<'_>, child: Table, columns: &[ColumnRef]) -> crate::Result<Table> {
	let positions = find_columns(ctx, &child, columns)?;
	Ok(child.distinct_on(&positions))
}

pub(crate) fn project(
	ctx: &ExecutionContext<'_>,
	child: Table,
	columns: &[ColumnRef],
	aliases: &[ColumnRef],
	given_name: Option<&TableName>,
) -> crate::Result<Table> {
	let positions = find_columns(ctx, &child, columns)?;
	let picked: Vec<(usize, ColumnRef)> = positions.into_iter().zip(aliases.iter().cloned()).collect();
	let projected = child.project(&picked);
	Ok(match given_name {
		Some(name) => projected.qualify(Some(name)),
		None => projected,
	})
}
