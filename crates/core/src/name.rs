// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Name of the table synthetic columns (functions, grouping keys, having
/// aggregates, order keys) are attached to.
pub const FUNCTION_TABLE: &str = "FUNCTIONTABLE";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName {
	pub catalog: Option<String>,
	pub schema: Option<String>,
	pub name: String,
}

impl TableName {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			catalog: None,
			schema: None,
			name: name.into(),
		}
	}

	pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			catalog: None,
			schema: Some(schema.into()),
			name: name.into(),
		}
	}

	pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
		self.catalog = Some(catalog.into());
		self
	}

	pub fn function_table() -> Self {
		Self::new(FUNCTION_TABLE)
	}

	pub fn is_function_table(&self) -> bool {
		self.catalog.is_none() && self.schema.is_none() && self.name == FUNCTION_TABLE
	}
}

impl Display for TableName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(catalog) = &self.catalog {
			write!(f, "{}.", catalog)?;
		}
		if let Some(schema) = &self.schema {
			write!(f, "{}.", schema)?;
		}
		f.write_str(&self.name)
	}
}

/// A column reference, optionally qualified by the table it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
	pub table: Option<TableName>,
	pub name: String,
}

impl ColumnRef {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			table: None,
			name: name.into(),
		}
	}

	pub fn qualified(table: TableName, name: impl Into<String>) -> Self {
		Self {
			table: Some(table),
			name: name.into(),
		}
	}

	pub fn function(name: impl Into<String>) -> Self {
		Self::qualified(TableName::function_table(), name)
	}

	pub fn is_qualified(&self) -> bool {
		self.table.is_some()
	}

	pub fn is_function(&self) -> bool {
		self.table.as_ref().is_some_and(TableName::is_function_table)
	}

	/// The same column name qualified by a different table.
	pub fn requalify(&self, table: Option<TableName>) -> Self {
		Self {
			table,
			name: self.name.clone(),
		}
	}
}

impl Display for ColumnRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.table {
			Some(table) => write!(f, "{}.{}", table, self.name),
			None => f.write_str(&self.name),
		}
	}
}

impl From<&str> for ColumnRef {
	fn from(value: &str) -> Self {
		match value.rsplit_once('.') {
			Some((table, name)) => {
				let mut parts: Vec<&str> = table.split('.').collect();
				let table_name = parts.pop().unwrap_or_default();
				let mut table = TableName::new(table_name);
				if let Some(schema) = parts.pop() {
					table.schema = Some(schema.to_string());
				}
				if let Some(catalog) = parts.pop() {
					table.catalog = Some(catalog.to_string());
				}
				ColumnRef::qualified(table, name)
			}
			None => ColumnRef::new(value),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_qualified() {
		let column = ColumnRef::from("shop.orders.id");
		assert_eq!(column.name, "id");
		assert_eq!(column.table, Some(TableName::qualified("shop", "orders")));
		assert_eq!(column.to_string(), "shop.orders.id");
	}

	#[test]
	fn test_parse_bare() {
		let column = ColumnRef::from("id");
		assert_eq!(column, ColumnRef::new("id"));
	}

	#[test]
	fn test_function_column() {
		let column = ColumnRef::function("#FN1");
		assert!(column.is_function());
		assert_eq!(column.to_string(), "FUNCTIONTABLE.#FN1");
	}
}
