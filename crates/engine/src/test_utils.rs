// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-memory catalog and storage plus shorthand builders for tests.

use quarry_core::{
	ColumnRef, SessionConfig, Table, TableColumn, TableName, interface::Storage, table::table_matches,
};
use quarry_sql::{
	catalog::{Catalog, ColumnDef, TableDef, ViewDef},
	expression::{Expression, Operator},
	select::SelectStatement,
};
use quarry_type::{
	Type, Value,
	error::diagnostic::{catalog, engine},
	return_error,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct MemoryTable {
	def: TableDef,
	rows: Vec<Vec<Value>>,
}

/// Tables and views held in memory. Serves both as the planning catalog and
/// as the storage scanned during evaluation.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
	tables: Vec<MemoryTable>,
	views: Vec<ViewDef>,
}

impl MemoryCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_table(mut self, name: &str, columns: &[(&str, Type)], rows: Vec<Vec<Value>>) -> Self {
		let def = TableDef {
			name: TableName::new(name),
			columns: columns
				.iter()
				.map(|(name, r#type)| ColumnDef {
					name: name.to_string(),
					r#type: *r#type,
				})
				.collect(),
		};
		self.tables.push(MemoryTable {
			def,
			rows,
		});
		self
	}

	pub fn with_view(mut self, name: &str, query: SelectStatement) -> Self {
		self.views.push(ViewDef {
			name: TableName::new(name),
			query,
		});
		self
	}

	/// Appends rows to an existing table.
	pub fn insert(&mut self, table: &TableName, rows: impl IntoIterator<Item = Vec<Value>>) -> crate::Result<()> {
		let config = SessionConfig::default();
		let Some(entry) = self.tables.iter_mut().find(|t| table_matches(table, &t.def.name, &config)) else {
			return_error!(catalog::source_not_found(table));
		};
		entry.rows.extend(rows);
		Ok(())
	}

	fn find(&self, name: &TableName) -> Option<&MemoryTable> {
		let config = SessionConfig::default();
		self.tables.iter().find(|t| table_matches(name, &t.def.name, &config))
	}
}

impl Catalog for MemoryCatalog {
	fn find_table(&self, name: &TableName) -> Option<TableDef> {
		self.find(name).map(|t| t.def.clone())
	}

	fn find_view(&self, name: &TableName) -> Option<ViewDef> {
		let config = SessionConfig::default();
		self.views.iter().find(|v| table_matches(name, &v.name, &config)).cloned()
	}
}

impl Storage for MemoryCatalog {
	fn scan(&self, table: &TableName) -> crate::Result<Table> {
		let Some(entry) = self.find(table) else {
			return_error!(engine::storage_failure(table, "no such table in storage"));
		};
		let width = entry.def.columns.len();
		if let Some(row) = entry.rows.iter().find(|row| row.len() != width) {
			return_error!(engine::storage_failure(
				table,
				format!("row has {} values, table has {} columns", row.len(), width)
			));
		}

		let columns = entry
			.def
			.columns
			.iter()
			.enumerate()
			.map(|(idx, column)| {
				TableColumn::typed(
					ColumnRef::qualified(entry.def.name.clone(), column.name.clone()),
					column.r#type,
					entry.rows.iter().map(|row| row[idx].clone()).collect(),
				)
			})
			.collect();
		Ok(Table::with_row_count(columns, entry.rows.len()))
	}
}

pub fn col(name: &str) -> Expression {
	Expression::column(name)
}

pub fn lit(value: impl Into<Value>) -> Expression {
	Expression::constant(value)
}

pub fn binary(left: Expression, operator: Operator, right: Expression) -> Expression {
	Expression::binary(left, operator, right)
}

pub fn eq(left: Expression, right: Expression) -> Expression {
	Expression::binary(left, Operator::Equal, right)
}

/// Installs a formatting subscriber filtered by `RUST_LOG`. Safe to call
/// from every test.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
}
