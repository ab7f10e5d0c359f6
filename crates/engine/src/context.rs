// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use quarry_core::{ColumnRef, SessionConfig, Table, interface::Storage, table::column_matches};
use quarry_sql::expression::CorrelatedVariable;
use quarry_type::{Value, error::diagnostic::engine, return_error};
use regex::Regex;
use tracing::trace;

use crate::function::Functions;

/// The row of an enclosing query that a sub-query is evaluated for.
#[derive(Debug, Clone, Default)]
pub struct OuterRow {
	pub columns: Vec<ColumnRef>,
	pub values: Vec<Value>,
}

/// State of one evaluation: storage access, the stack of enclosing rows used
/// by correlated references and the results of non-correlated sub-queries.
///
/// A context is bound to a single thread and a single evaluation. Cached
/// sub-query results are never invalidated.
pub struct ExecutionContext<'a> {
	storage: &'a dyn Storage,
	config: &'a SessionConfig,
	functions: &'a Functions,
	outer: RefCell<Vec<OuterRow>>,
	cache: RefCell<HashMap<usize, Rc<Table>>>,
	patterns: RefCell<HashMap<String, Regex>>,
}

impl<'a> ExecutionContext<'a> {
	pub fn new(storage: &'a dyn Storage, config: &'a SessionConfig, functions: &'a Functions) -> Self {
		Self {
			storage,
			config,
			functions,
			outer: RefCell::new(vec![]),
			cache: RefCell::new(HashMap::new()),
			patterns: RefCell::new(HashMap::new()),
		}
	}

	pub fn storage(&self) -> &dyn Storage {
		self.storage
	}

	pub fn config(&self) -> &SessionConfig {
		self.config
	}

	pub fn functions(&self) -> &Functions {
		self.functions
	}

	/// Runs `f` with `row` as the innermost enclosing row.
	pub fn with_outer_row<T>(&self, row: OuterRow, f: impl FnOnce() -> crate::Result<T>) -> crate::Result<T> {
		self.outer.borrow_mut().push(row);
		let result = f();
		self.outer.borrow_mut().pop();
		result
	}

	/// The value of a correlated reference; level 1 is the innermost
	/// enclosing row.
	pub fn correlated(&self, variable: &CorrelatedVariable) -> crate::Result<Value> {
		let outer = self.outer.borrow();
		let Some(frame) = outer.len().checked_sub(variable.level).and_then(|idx| outer.get(idx)) else {
			return_error!(engine::correlated_out_of_scope(variable.level, &variable.column));
		};
		match frame.columns.iter().position(|column| column_matches(&variable.column, column, self.config)) {
			Some(idx) => Ok(frame.values[idx].clone()),
			None => return_error!(engine::correlated_out_of_scope(variable.level, &variable.column)),
		}
	}

	pub fn cached(&self, id: usize) -> Option<Rc<Table>> {
		let result = self.cache.borrow().get(&id).cloned();
		if result.is_some() {
			trace!(id, "sub-query cache hit");
		}
		result
	}

	pub fn cache(&self, id: usize, table: Rc<Table>) {
		self.cache.borrow_mut().insert(id, table);
	}

	/// Compiles `source` once per context.
	pub(crate) fn regex(&self, source: &str, pattern: &str) -> crate::Result<Regex> {
		if let Some(regex) = self.patterns.borrow().get(source) {
			return Ok(regex.clone());
		}
		let regex = match Regex::new(source) {
			Ok(regex) => regex,
			Err(err) => return_error!(engine::invalid_pattern(pattern, err)),
		};
		self.patterns.borrow_mut().insert(source.to_string(), regex.clone());
		Ok(regex)
	}
}
