// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use quarry_type::{Value, error::diagnostic::plan, return_error};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Table, TableColumn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOperation {
	Union,
	Intersect,
	Except,
}

impl Display for SetOperation {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			SetOperation::Union => f.write_str("UNION"),
			SetOperation::Intersect => f.write_str("INTERSECT"),
			SetOperation::Except => f.write_str("EXCEPT"),
		}
	}
}

impl Table {
	/// Combines two tables of the same shape. The result carries the column
	/// names of `self`.
	///
	/// Without `all`, duplicate rows are removed from the result. With `all`,
	/// rows are treated as a multiset: union concatenates, intersect keeps the
	/// smaller count of each row and except subtracts counts.
	pub fn combine(&self, other: &Table, operation: SetOperation, all: bool) -> crate::Result<Table> {
		self.check_same_shape(other)?;

		let mut right_counts: IndexMap<Vec<Value>, usize> = IndexMap::new();
		for row in other.rows() {
			*right_counts.entry(row).or_default() += 1;
		}

		let mut rows: Vec<Vec<Value>> = Vec::new();
		match operation {
			SetOperation::Union => {
				rows.extend(self.rows());
				rows.extend(other.rows());
			}
			SetOperation::Intersect => {
				for row in self.rows() {
					if let Some(count) = right_counts.get_mut(&row) {
						if *count > 0 {
							if all {
								*count -= 1;
							}
							rows.push(row);
						}
					}
				}
			}
			SetOperation::Except => {
				for row in self.rows() {
					match right_counts.get_mut(&row) {
						Some(count) if *count > 0 => {
							if all {
								*count -= 1;
							}
						}
						_ => rows.push(row),
					}
				}
			}
		}

		if !all {
			let mut seen = indexmap::IndexSet::new();
			rows.retain(|row| seen.insert(row.clone()));
		}

		let row_count = rows.len();
		trace!(%operation, all, rows = row_count, "combined tables");
		let mut columns: Vec<TableColumn> = self
			.columns
			.iter()
			.zip(&other.columns)
			.map(|(l, r)| {
				let r#type = if l.r#type == quarry_type::Type::Undefined {
					r.r#type
				} else {
					l.r#type
				};
				TableColumn::typed(l.name.clone(), r#type, Vec::with_capacity(row_count))
			})
			.collect();
		for row in rows {
			for (column, value) in columns.iter_mut().zip(row) {
				column.data.push(value);
			}
		}
		Ok(Table::with_row_count(columns, row_count))
	}

	fn check_same_shape(&self, other: &Table) -> crate::Result<()> {
		if self.column_count() != other.column_count() {
			return_error!(plan::composite_shape_mismatch(format!(
				"left side has {} columns, right side has {}",
				self.column_count(),
				other.column_count()
			)));
		}
		for (l, r) in self.columns.iter().zip(&other.columns) {
			if !l.r#type.is_compatible(&r.r#type) {
				return_error!(plan::composite_shape_mismatch(format!(
					"column {} is {} on the left side and {} on the right side",
					l.name, l.r#type, r.r#type
				)));
			}
		}
		Ok(())
	}
}
