// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{
	ColumnRef, SessionConfig, TableName,
	table::{column_matches, table_matches},
};
use quarry_type::{error::diagnostic::query, return_error};

use crate::expression::CorrelatedVariable;

/// One queryable source of a SELECT block.
#[derive(Debug, Clone, PartialEq)]
pub struct FromTableSource {
	pub key: usize,
	/// The name the source is exposed under: its alias, else its own name.
	/// Unaliased sub-queries have none.
	pub name: Option<TableName>,
	pub columns: Vec<ColumnRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
	Local(ColumnRef),
	Outer(CorrelatedVariable),
}

/// The sources of one SELECT block in declared order, chained to the sources
/// of the enclosing block for correlated references.
#[derive(Debug)]
pub struct FromSet<'a> {
	sources: Vec<FromTableSource>,
	parent: Option<&'a FromSet<'a>>,
	config: &'a SessionConfig,
}

impl<'a> FromSet<'a> {
	pub fn new(config: &'a SessionConfig, parent: Option<&'a FromSet<'a>>) -> Self {
		Self {
			sources: vec![],
			parent,
			config,
		}
	}

	pub fn add_source(&mut self, name: Option<TableName>, columns: Vec<ColumnRef>) -> crate::Result<usize> {
		if let Some(name) = &name {
			let duplicate = self.sources.iter().filter_map(|s| s.name.as_ref()).any(|existing| {
				table_matches(name, existing, self.config) && table_matches(existing, name, self.config)
			});
			if duplicate {
				return_error!(query::duplicate_source(name));
			}
		}
		let key = self.sources.len();
		self.sources.push(FromTableSource {
			key,
			name,
			columns,
		});
		Ok(key)
	}

	pub fn sources(&self) -> &[FromTableSource] {
		&self.sources
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	pub fn config(&self) -> &SessionConfig {
		self.config
	}

	/// Every exposed column, sources in declared order.
	pub fn all_columns(&self) -> Vec<ColumnRef> {
		self.sources.iter().flat_map(|s| s.columns.iter().cloned()).collect()
	}

	pub fn find_source(&self, name: &TableName) -> Option<&FromTableSource> {
		self.sources
			.iter()
			.find(|s| s.name.as_ref().is_some_and(|exposed| table_matches(name, exposed, self.config)))
	}

	/// Resolves a reference against the sources of this block only.
	pub fn resolve_local(&self, reference: &ColumnRef) -> crate::Result<Option<ColumnRef>> {
		let mut found: Option<&ColumnRef> = None;
		for column in self.sources.iter().flat_map(|s| s.columns.iter()) {
			if !column_matches(reference, column, self.config) {
				continue;
			}
			if found.is_some() {
				return_error!(query::ambiguous_column(reference));
			}
			found = Some(column);
		}
		Ok(found.cloned())
	}

	/// Resolves a reference against this block, then against each enclosing
	/// block in turn.
	pub fn resolve(&self, reference: &ColumnRef) -> crate::Result<Resolved> {
		if let Some(column) = self.resolve_local(reference)? {
			return Ok(Resolved::Local(column));
		}
		let mut level = 1;
		let mut current = self.parent;
		while let Some(from_set) = current {
			if let Some(column) = from_set.resolve_local(reference)? {
				return Ok(Resolved::Outer(CorrelatedVariable {
					level,
					column,
				}));
			}
			level += 1;
			current = from_set.parent;
		}
		return_error!(query::column_not_found(reference))
	}
}
