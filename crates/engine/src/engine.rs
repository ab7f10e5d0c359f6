// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{ops::Deref, sync::Arc};

use quarry_core::{SessionConfig, Table, TableName, interface::Storage};
use quarry_sql::{
	catalog::{Catalog, TableDef, ViewDef},
	plan::{PlanNode, compile_select},
	select::SelectStatement,
};
use tracing::{debug, instrument};

use crate::{context::ExecutionContext, evaluate::Evaluate, function::Functions};

/// Compiles and evaluates SELECT statements against one source that serves
/// both as catalog and as storage. Cloning shares the source.
pub struct Engine<S>(Arc<EngineInner<S>>)
where
	S: Catalog + Storage;

pub struct EngineInner<S>
where
	S: Catalog + Storage,
{
	source: S,
	config: SessionConfig,
	functions: Functions,
}

impl<S> Engine<S>
where
	S: Catalog + Storage,
{
	pub fn new(source: S, config: SessionConfig) -> Self {
		Self::with_functions(source, config, Functions::new())
	}

	pub fn with_functions(source: S, config: SessionConfig, functions: Functions) -> Self {
		Self(Arc::new(EngineInner {
			source,
			config,
			functions,
		}))
	}

	pub fn source(&self) -> &S {
		&self.source
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn plan(&self, statement: &SelectStatement) -> crate::Result<PlanNode> {
		let catalog = EngineCatalog {
			source: &self.source,
			functions: &self.functions,
		};
		compile_select(&catalog, &self.config, statement)
	}

	/// Evaluates an already compiled plan in a fresh context.
	#[instrument(name = "engine::execute", level = "trace", skip_all)]
	pub fn execute(&self, plan: &PlanNode) -> crate::Result<Table> {
		let ctx = ExecutionContext::new(&self.source, &self.config, &self.functions);
		let result = plan.evaluate(&ctx)?;
		debug!(rows = result.row_count(), columns = result.column_count(), "query evaluated");
		Ok(result)
	}

	pub fn query(&self, statement: &SelectStatement) -> crate::Result<Table> {
		let plan = self.plan(statement)?;
		self.execute(&plan)
	}

	pub fn explain(&self, statement: &SelectStatement) -> crate::Result<String> {
		Ok(self.plan(statement)?.debug_string())
	}

	/// Every base table the statement reads, in discovery order. The caller
	/// locks these before evaluation.
	pub fn lock_set(&self, statement: &SelectStatement) -> crate::Result<Vec<TableName>> {
		let mut tables = Vec::new();
		self.plan(statement)?.discover_table_names(&mut tables);
		Ok(tables)
	}
}

/// The source's schema with aggregates taken from the engine's function
/// registry.
struct EngineCatalog<'a, S> {
	source: &'a S,
	functions: &'a Functions,
}

impl<S: Catalog> Catalog for EngineCatalog<'_, S> {
	fn find_table(&self, name: &TableName) -> Option<TableDef> {
		self.source.find_table(name)
	}

	fn find_view(&self, name: &TableName) -> Option<ViewDef> {
		self.source.find_view(name)
	}

	fn is_aggregate(&self, name: &str) -> bool {
		self.functions.is_aggregate(name)
	}
}

impl<S> Clone for Engine<S>
where
	S: Catalog + Storage,
{
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<S> Deref for Engine<S>
where
	S: Catalog + Storage,
{
	type Target = EngineInner<S>;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
