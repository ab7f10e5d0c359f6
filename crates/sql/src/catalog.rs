// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::TableName;
use quarry_type::Type;

use crate::{expression::is_aggregate_function, select::SelectStatement};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
	pub name: String,
	pub r#type: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
	pub name: TableName,
	pub columns: Vec<ColumnDef>,
}

/// A named query. Its columns are the output columns of `query`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDef {
	pub name: TableName,
	pub query: SelectStatement,
}

/// Schema lookup used while planning. Returned definitions carry the
/// canonical name of the object.
pub trait Catalog {
	fn find_table(&self, name: &TableName) -> Option<TableDef>;

	fn find_view(&self, name: &TableName) -> Option<ViewDef>;

	/// Whether calls to `name` aggregate over a group.
	fn is_aggregate(&self, name: &str) -> bool {
		is_aggregate_function(name)
	}
}

impl<C: Catalog + ?Sized> Catalog for &C {
	fn find_table(&self, name: &TableName) -> Option<TableDef> {
		(**self).find_table(name)
	}

	fn find_view(&self, name: &TableName) -> Option<ViewDef> {
		(**self).find_view(name)
	}

	fn is_aggregate(&self, name: &str) -> bool {
		(**self).is_aggregate(name)
	}
}
