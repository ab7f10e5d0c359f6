// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::Value;

use crate::{Table, TableColumn};

/// A pair of row positions making up one joined row. A missing side is padded
/// with undefined values.
pub type JoinedRow = (Option<usize>, Option<usize>);

impl Table {
	/// Builds the joined table, left columns first.
	pub fn join_rows(left: &Table, right: &Table, rows: &[JoinedRow]) -> Table {
		let mut columns = Vec::with_capacity(left.column_count() + right.column_count());
		for (table, pick) in [(left, 0usize), (right, 1usize)] {
			for column in &table.columns {
				let data = rows
					.iter()
					.map(|pair| {
						let row = if pick == 0 {
							pair.0
						} else {
							pair.1
						};
						row.map_or(Value::Undefined, |r| column.data[r].clone())
					})
					.collect();
				columns.push(TableColumn {
					name: column.name.clone(),
					r#type: column.r#type,
					data,
				});
			}
		}
		Table::with_row_count(columns, rows.len())
	}

	/// Every left row combined with every right row.
	pub fn product(left: &Table, right: &Table) -> Table {
		let mut rows = Vec::with_capacity(left.row_count() * right.row_count());
		for l in 0..left.row_count() {
			for r in 0..right.row_count() {
				rows.push((Some(l), Some(r)));
			}
		}
		Table::join_rows(left, right, &rows)
	}
}
