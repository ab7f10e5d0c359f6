// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{
	GetType, Type, Value,
	error::diagnostic::{engine, query},
	return_error,
};
use serde::{Deserialize, Serialize};

use crate::{ColumnRef, SessionConfig, TableName};

mod display;
mod join;
mod set;
mod sort;

pub use join::JoinedRow;
pub use set::SetOperation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
	pub name: ColumnRef,
	pub r#type: Type,
	pub data: Vec<Value>,
}

impl TableColumn {
	/// Creates a column, inferring its type from the first defined value.
	pub fn new(name: impl Into<ColumnRef>, data: Vec<Value>) -> Self {
		let r#type = data.iter().map(Value::get_type).find(|ty| *ty != Type::Undefined).unwrap_or(Type::Undefined);
		Self {
			name: name.into(),
			r#type,
			data,
		}
	}

	pub fn typed(name: impl Into<ColumnRef>, r#type: Type, data: Vec<Value>) -> Self {
		Self {
			name: name.into(),
			r#type,
			data,
		}
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/// A materialized, columnar result set.
///
/// The row count is tracked separately so a table without columns can still
/// carry rows, as the single row source does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
	pub columns: Vec<TableColumn>,
	row_count: usize,
}

impl Table {
	pub fn new(columns: Vec<TableColumn>) -> Self {
		let row_count = columns.first().map_or(0, TableColumn::len);
		debug_assert!(columns.iter().all(|c| c.len() == row_count));
		Self {
			columns,
			row_count,
		}
	}

	pub fn with_row_count(columns: Vec<TableColumn>, row_count: usize) -> Self {
		debug_assert!(columns.iter().all(|c| c.len() == row_count));
		Self {
			columns,
			row_count,
		}
	}

	/// One row, no columns.
	pub fn single_row() -> Self {
		Self::with_row_count(vec![], 1)
	}

	/// A table with the given header and no rows.
	pub fn empty(header: impl IntoIterator<Item = (ColumnRef, Type)>) -> Self {
		let columns = header.into_iter().map(|(name, r#type)| TableColumn::typed(name, r#type, vec![])).collect();
		Self::with_row_count(columns, 0)
	}

	pub fn row_count(&self) -> usize {
		self.row_count
	}

	pub fn column_count(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.row_count == 0
	}

	pub fn column_names(&self) -> impl Iterator<Item = &ColumnRef> {
		self.columns.iter().map(|c| &c.name)
	}

	pub fn header(&self) -> Vec<(ColumnRef, Type)> {
		self.columns.iter().map(|c| (c.name.clone(), c.r#type)).collect()
	}

	pub fn value(&self, row: usize, column: usize) -> &Value {
		&self.columns[column].data[row]
	}

	pub fn row(&self, row: usize) -> Vec<Value> {
		self.columns.iter().map(|c| c.data[row].clone()).collect()
	}

	pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
		(0..self.row_count).map(|row| self.row(row))
	}

	/// Resolves a column reference to its position.
	///
	/// A qualified reference must match the table and the column name. An
	/// unqualified reference matches by column name alone and fails when more
	/// than one column carries that name.
	pub fn find_column(&self, reference: &ColumnRef, config: &SessionConfig) -> crate::Result<usize> {
		let mut found = None;
		for (idx, column) in self.columns.iter().enumerate() {
			if !column_matches(reference, &column.name, config) {
				continue;
			}
			if found.is_some() {
				return_error!(query::ambiguous_column(reference));
			}
			found = Some(idx);
		}
		match found {
			Some(idx) => Ok(idx),
			None => Err(quarry_type::error!(engine::column_not_in_frame(reference))),
		}
	}

	pub fn try_find_column(&self, reference: &ColumnRef, config: &SessionConfig) -> Option<usize> {
		self.find_column(reference, config).ok()
	}

	/// Copies the given rows, in order. Rows may repeat.
	pub fn select_rows(&self, rows: &[usize]) -> Table {
		let columns = self
			.columns
			.iter()
			.map(|c| TableColumn {
				name: c.name.clone(),
				r#type: c.r#type,
				data: rows.iter().map(|&r| c.data[r].clone()).collect(),
			})
			.collect();
		Table::with_row_count(columns, rows.len())
	}

	/// Keeps the rows whose mask entry is set.
	pub fn filter(&self, mask: &[bool]) -> Table {
		debug_assert_eq!(mask.len(), self.row_count);
		let rows: Vec<usize> = mask.iter().enumerate().filter(|(_, keep)| **keep).map(|(r, _)| r).collect();
		self.select_rows(&rows)
	}

	/// Picks columns by position and gives each its output name.
	pub fn project(&self, columns: &[(usize, ColumnRef)]) -> Table {
		let columns = columns
			.iter()
			.map(|(idx, name)| {
				let source = &self.columns[*idx];
				TableColumn {
					name: name.clone(),
					r#type: source.r#type,
					data: source.data.clone(),
				}
			})
			.collect();
		Table::with_row_count(columns, self.row_count)
	}

	/// Appends a column. Its length must match the row count.
	pub fn with_column(mut self, column: TableColumn) -> Table {
		debug_assert_eq!(column.len(), self.row_count);
		self.columns.push(column);
		self
	}

	/// Requalifies every column with `table`.
	pub fn qualify(mut self, table: Option<&TableName>) -> Table {
		for column in &mut self.columns {
			column.name = column.name.requalify(table.cloned());
		}
		self
	}

	/// Keeps the first row of each distinct combination of `columns`.
	pub fn distinct_on(&self, columns: &[usize]) -> Table {
		let mut seen = indexmap::IndexSet::new();
		let mut rows = Vec::new();
		for row in 0..self.row_count {
			let key: Vec<Value> = columns.iter().map(|&c| self.columns[c].data[row].clone()).collect();
			if seen.insert(key) {
				rows.push(row);
			}
		}
		self.select_rows(&rows)
	}
}

/// Whether `reference` names `actual`, honoring the parts it spells out.
pub fn column_matches(reference: &ColumnRef, actual: &ColumnRef, config: &SessionConfig) -> bool {
	if !config.identifiers_equal(&reference.name, &actual.name) {
		return false;
	}
	match (&reference.table, &actual.table) {
		(None, _) => true,
		(Some(_), None) => false,
		(Some(reference), Some(actual)) => table_matches(reference, actual, config),
	}
}

/// A reference table name matches when every part it spells out matches.
pub fn table_matches(reference: &TableName, actual: &TableName, config: &SessionConfig) -> bool {
	if !config.identifiers_equal(&reference.name, &actual.name) {
		return false;
	}
	let part_matches = |r: &Option<String>, a: &Option<String>| match (r, a) {
		(None, _) => true,
		(Some(r), Some(a)) => config.identifiers_equal(r, a),
		(Some(_), None) => false,
	};
	part_matches(&reference.schema, &actual.schema) && part_matches(&reference.catalog, &actual.catalog)
}
