// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use indexmap::IndexMap;
use quarry_core::{ColumnRef, Table, TableColumn};
use quarry_sql::plan::FunctionColumn;
use quarry_type::Value;
use tracing::debug;

use crate::{
	context::ExecutionContext,
	evaluate::find_columns,
	expression::{Scope, evaluate},
};

/// Partitions the child rows by the `group_by` columns, in order of first
/// appearance. Without `group_by` every row belongs to a single group, which
/// exists even when the child is empty.
pub(crate) fn group(
	ctx: &ExecutionContext<'_>,
	child: Table,
	group_by: &[ColumnRef],
	group_max: Option<&ColumnRef>,
	functions: &[FunctionColumn],
) -> crate::Result<Table> {
	let groups: Vec<Vec<usize>> = if group_by.is_empty() {
		vec![(0..child.row_count()).collect()]
	} else {
		let positions = find_columns(ctx, &child, group_by)?;
		let mut groups: IndexMap<Vec<Value>, Vec<usize>> = IndexMap::new();
		for row in 0..child.row_count() {
			let key = positions.iter().map(|&column| child.value(row, column).clone()).collect();
			groups.entry(key).or_default().push(row);
		}
		groups.into_values().collect()
	};
	debug!(groups = groups.len(), rows = child.row_count(), "grouped rows");

	let max_column = group_max.map(|column| child.find_column(column, ctx.config())).transpose()?;
	let representatives: Vec<Option<usize>> = groups
		.iter()
		.map(|rows| match max_column {
			Some(column) => group_max_row(&child, rows, column),
			None => rows.first().copied(),
		})
		.collect();

	let mut columns: Vec<TableColumn> = child
		.columns
		.iter()
		.map(|column| {
			let data = representatives
				.iter()
				.map(|row| row.map_or(Value::Undefined, |row| column.data[row].clone()))
				.collect();
			TableColumn::typed(column.name.clone(), column.r#type, data)
		})
		.collect();

	for function in functions {
		let mut data = Vec::with_capacity(groups.len());
		for (rows, representative) in groups.iter().zip(&representatives) {
			data.push(evaluate(
				ctx,
				&function.expression,
				Scope::Group {
					table: &child,
					rows,
					representative: *representative,
				},
			)?);
		}
		columns.push(TableColumn::new(function.name.clone(), data));
	}

	Ok(Table::with_row_count(columns, groups.len()))
}

/// The first row holding the greatest value of `column`.
fn group_max_row(table: &Table, rows: &[usize], column: usize) -> Option<usize> {
	let mut result: Option<usize> = None;
	for &row in rows {
		let replace = match result {
			None => true,
			Some(best) => table.value(row, column).sort_cmp(table.value(best, column)) == Ordering::Greater,
		};
		if replace {
			result = Some(row);
		}
	}
	result
}
