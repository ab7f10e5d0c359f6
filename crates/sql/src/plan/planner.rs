// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cell::Cell;

use quarry_core::{ColumnRef, SessionConfig, SortDirection, TableName, table::column_matches};
use quarry_type::{
	Type,
	error::diagnostic::{catalog, query},
	return_error,
};
use tracing::{debug, instrument};

use crate::{
	PlanError,
	catalog::Catalog,
	expression::{CachePoint, Expression},
	plan::{
		BranchOp, FetchNode, FunctionColumn, PlanNode, SingleOp,
		column_set::ColumnSet,
		from_set::{FromSet, Resolved},
		table_source::TableSourcePlanner,
	},
	select::{FromTable, OrderBy, SelectItem, SelectStatement},
};

/// A compiled SELECT block and the names of its output columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSelect {
	pub plan: PlanNode,
	pub header: Vec<ColumnRef>,
	/// Output column types as far as they are known while planning;
	/// `Undefined` for computed columns.
	pub types: Vec<Type>,
}

struct PlannedSource {
	name: Option<TableName>,
	columns: Vec<ColumnRef>,
	types: Vec<Type>,
	node: PlanNode,
}

#[derive(Debug, Default)]
struct Ordering {
	columns: Vec<ColumnRef>,
	directions: Vec<SortDirection>,
	/// Order keys computed per row before sorting.
	functions: Vec<FunctionColumn>,
	/// Order keys computed per group.
	aggregates: Vec<FunctionColumn>,
}

pub struct Planner<'a> {
	catalog: &'a dyn Catalog,
	config: &'a SessionConfig,
	next_cache_id: Cell<usize>,
}

impl<'a> Planner<'a> {
	pub fn new(catalog: &'a dyn Catalog, config: &'a SessionConfig) -> Self {
		Self {
			catalog,
			config,
			next_cache_id: Cell::new(1),
		}
	}

	#[instrument(name = "sql::plan::compile", level = "trace", skip_all)]
	pub fn compile(&self, statement: &SelectStatement) -> crate::Result<PlanNode> {
		Ok(self.plan_select(statement, None)?.plan)
	}

	/// Plans one SELECT block. `parent` is the from-set of the enclosing block
	/// when planning a sub-query of a search expression.
	#[instrument(name = "sql::plan::select", level = "trace", skip_all)]
	pub fn plan_select(&self, statement: &SelectStatement, parent: Option<&FromSet<'_>>) -> crate::Result<PlannedSelect> {
		let mut from_set = FromSet::new(self.config, parent);
		let mut sources = TableSourcePlanner::new();
		let mut source_types = vec![];
		for table in &statement.from.tables {
			let source = self.plan_from_table(table)?;
			from_set.add_source(source.name, source.columns.clone())?;
			source_types.extend(source.columns.iter().cloned().zip(source.types));
			sources.add_plan(source.node, source.columns);
		}

		let column_set = self.prepare_columns(statement, &from_set)?;

		let mut filter = match &statement.filter {
			Some(filter) => Some(self.qualify(filter.clone(), &from_set, None)?),
			None => None,
		};
		self.prepare_joins(statement, &from_set, &mut sources, &mut filter)?;

		let mut extra_aggregates = vec![];
		let having = match &statement.having {
			Some(having) => {
				let qualified = self.qualify(having.clone(), &from_set, Some(&column_set))?;
				Some(extract_having_aggregates(qualified, &mut extra_aggregates)?)
			}
			None => None,
		};

		let (group_by, group_functions) = self.prepare_group_by(statement, &from_set, &column_set)?;
		let group_max = match &statement.group_max {
			Some(column) => match from_set.resolve_local(column)? {
				Some(column) => Some(column),
				None => {
					return Err(PlanError::GroupMaxNotResolved {
						name: column.to_string(),
					}
					.into());
				}
			},
			None => None,
		};

		let ordering = if statement.composite.is_none() {
			self.prepare_order_by(&statement.order_by, &from_set, &column_set)?
		} else {
			Ordering::default()
		};

		let grouped = column_set.has_aggregates()
			|| !extra_aggregates.is_empty()
			|| !ordering.aggregates.is_empty()
			|| !statement.group_by.is_empty();
		debug!(sources = from_set.sources().len(), columns = column_set.columns.len(), grouped, "planning select block");

		let internal = column_set.internal_names();
		let header = column_set.resolved_names();
		let types = column_set.output_types(&source_types);

		let mut node = if from_set.is_empty() {
			if grouped {
				return Err(PlanError::AggregateWithoutFrom.into());
			}
			let mut node = PlanNode::single_row();
			if let Some(predicate) = filter {
				node = PlanNode::single(
					node,
					SingleOp::ConstantSelect {
						predicate,
					},
				);
			}
			if !column_set.functions.is_empty() {
				node = PlanNode::single(
					node,
					SingleOp::Functions {
						functions: column_set.functions.clone(),
					},
				);
			}
			node
		} else {
			let mut node = sources.plan_search(filter)?;
			if grouped {
				if !group_functions.is_empty() {
					node = PlanNode::single(
						node,
						SingleOp::Functions {
							functions: group_functions,
						},
					);
				}
				let mut functions = column_set.functions.clone();
				functions.extend(extra_aggregates);
				functions.extend(ordering.aggregates.iter().cloned());
				node = PlanNode::single(
					node,
					SingleOp::Group {
						group_by,
						group_max,
						functions,
					},
				);
			} else if !column_set.functions.is_empty() {
				node = PlanNode::single(
					node,
					SingleOp::Functions {
						functions: column_set.functions.clone(),
					},
				);
			}

			if let Some(having) = having {
				node = TableSourcePlanner::over(node).plan_search(Some(having))?;
			}

			if statement.distinct && !internal.is_empty() {
				node = PlanNode::single(
					node,
					SingleOp::Distinct {
						columns: internal.clone(),
					},
				);
			}
			node
		};

		match &statement.composite {
			None => {
				if !from_set.is_empty() {
					node = apply_ordering(node, ordering);
				}
				node = project(node, internal, header.clone());
			}
			Some(composite) => {
				node = project(node, internal, header.clone());
				let right = self.plan_select(&composite.statement, parent)?;
				if right.header.len() != header.len() {
					return Err(PlanError::CompositeShapeMismatch {
						detail: format!(
							"left side has {} columns, right side has {}",
							header.len(),
							right.header.len()
						),
					}
					.into());
				}
				for ((column, l), r) in header.iter().zip(&types).zip(&right.types) {
					if !l.is_compatible(r) {
						return Err(PlanError::CompositeShapeMismatch {
							detail: format!(
								"column {} is {} on the left side and {} on the right side",
								column, l, r
							),
						}
						.into());
					}
				}
				node = PlanNode::branch(
					node,
					right.plan,
					BranchOp::Composite {
						operation: composite.operation,
						all: composite.all,
					},
				);
				node = self.plan_composite_order_by(node, &statement.order_by, &header)?;
			}
		}

		Ok(PlannedSelect {
			plan: node,
			header,
			types,
		})
	}

	fn plan_from_table(&self, table: &FromTable) -> crate::Result<PlannedSource> {
		match table {
			FromTable::Table {
				name,
				alias,
			} => {
				let alias = alias.as_ref().map(TableName::new);
				if let Some(def) = self.catalog.find_table(name) {
					let exposed = alias.clone().unwrap_or_else(|| def.name.clone());
					let columns = def
						.columns
						.iter()
						.map(|column| ColumnRef::qualified(exposed.clone(), column.name.clone()))
						.collect();
					return Ok(PlannedSource {
						name: Some(exposed),
						columns,
						types: def.columns.iter().map(|column| column.r#type).collect(),
						node: PlanNode::table(def.name, alias),
					});
				}
				if let Some(view) = self.catalog.find_view(name) {
					let planned = self.plan_select(&view.query, None)?;
					let exposed = alias.clone().unwrap_or_else(|| view.name.clone());
					let columns = planned.header.iter().map(|column| column.requalify(Some(exposed.clone()))).collect();
					return Ok(PlannedSource {
						name: Some(exposed),
						columns,
						types: planned.types,
						node: PlanNode::Fetch(FetchNode::View {
							name: view.name,
							alias,
							plan: Box::new(planned.plan),
						}),
					});
				}
				return_error!(catalog::source_not_found(name))
			}
			FromTable::SubQuery {
				query,
				alias,
			} => {
				let planned = self.plan_select(query, None)?;
				match alias {
					Some(alias) => {
						let name = TableName::new(alias.clone());
						let columns = planned.header.iter().map(|column| column.requalify(Some(name.clone()))).collect();
						Ok(PlannedSource {
							node: planned.plan.with_given_name(name.clone(), &planned.header),
							name: Some(name),
							columns,
							types: planned.types,
						})
					}
					None => Ok(PlannedSource {
						name: None,
						columns: planned.header,
						types: planned.types,
						node: planned.plan,
					}),
				}
			}
		}
	}

	fn prepare_columns(&self, statement: &SelectStatement, from_set: &FromSet<'_>) -> crate::Result<ColumnSet> {
		let mut column_set = ColumnSet::new();
		for item in &statement.columns {
			match item {
				SelectItem::Glob(None) => {
					for column in from_set.all_columns() {
						column_set.add_variable(column);
					}
				}
				SelectItem::Glob(Some(table)) => {
					let Some(source) = from_set.find_source(table) else {
						return_error!(query::glob_source_not_found(table));
					};
					for column in &source.columns {
						column_set.add_variable(column.clone());
					}
				}
				SelectItem::Expression {
					expression,
					alias,
				} => {
					if expression.contains_select() {
						return Err(PlanError::SubqueryInSelectList.into());
					}
					let qualified = self.qualify(expression.clone(), from_set, None)?;
					column_set.add(qualified, alias.clone(), self.config);
				}
			}
		}
		Ok(column_set)
	}

	/// Folds ON expressions into the search expression when every join is an
	/// inner join; otherwise records them on the table source plans.
	fn prepare_joins(
		&self,
		statement: &SelectStatement,
		from_set: &FromSet<'_>,
		sources: &mut TableSourcePlanner,
		filter: &mut Option<Expression>,
	) -> crate::Result<()> {
		let joins = &statement.from.joins;
		if joins.iter().all(|join| !join.kind.is_outer()) {
			for on in joins.iter().filter_map(|join| join.on.as_ref()) {
				let on = self.qualify(on.clone(), from_set, None)?;
				debug!(on = %on, "folding inner join condition into the search expression");
				*filter = Some(match filter.take() {
					Some(existing) => existing.and(on),
					None => on,
				});
			}
			return Ok(());
		}

		for (idx, join) in joins.iter().enumerate() {
			let on = match &join.on {
				Some(on) => Some(self.qualify(on.clone(), from_set, None)?),
				None if join.kind.is_outer() => {
					return Err(PlanError::OuterJoinWithoutOn {
						join: join.kind.to_string(),
					}
					.into());
				}
				None => None,
			};
			if join.kind.is_outer() || on.is_some() {
				sources.set_join_info_between(idx, join.kind, on);
			}
		}
		Ok(())
	}

	fn prepare_group_by(
		&self,
		statement: &SelectStatement,
		from_set: &FromSet<'_>,
		column_set: &ColumnSet,
	) -> crate::Result<(Vec<ColumnRef>, Vec<FunctionColumn>)> {
		let mut group_by = vec![];
		let mut functions: Vec<FunctionColumn> = vec![];
		for expression in &statement.group_by {
			let function = match expression {
				Expression::Column(column) => {
					if let Some(target) = column_set.resolve_alias(column, self.config)? {
						match column_set.function_expression(&target.internal) {
							Some(function) => function.clone(),
							None => {
								group_by.push(target.internal.clone());
								continue;
							}
						}
					} else {
						match from_set.resolve_local(column)? {
							Some(column) => {
								group_by.push(column);
								continue;
							}
							None => return_error!(query::column_not_found(column)),
						}
					}
				}
				other => self.qualify(other.clone(), from_set, None)?,
			};

			if function.contains_aggregate() {
				return Err(PlanError::AggregateInGroupBy {
					expression: function.to_string(),
				}
				.into());
			}
			let name = ColumnRef::function(format!("#GROUPBY-{}", functions.len() + 1));
			group_by.push(name.clone());
			functions.push(FunctionColumn {
				name,
				expression: function,
			});
		}
		Ok((group_by, functions))
	}

	fn prepare_order_by(
		&self,
		order_by: &[OrderBy],
		from_set: &FromSet<'_>,
		column_set: &ColumnSet,
	) -> crate::Result<Ordering> {
		let mut ordering = Ordering::default();
		for order in order_by {
			if let Some(idx) = position(&order.expression, column_set.columns.len())? {
				ordering.columns.push(column_set.columns[idx].internal.clone());
				ordering.directions.push(order.direction);
				continue;
			}
			let column = match &order.expression {
				Expression::Column(column) => {
					if let Some(target) = column_set.resolve_alias(column, self.config)? {
						target.internal.clone()
					} else {
						match from_set.resolve_local(column)? {
							Some(column) => column,
							None => {
								return Err(PlanError::OrderByNotResolved {
									name: column.to_string(),
								}
								.into());
							}
						}
					}
				}
				other => {
					let expression = self.qualify(other.clone(), from_set, Some(column_set))?;
					let count = ordering.functions.len() + ordering.aggregates.len();
					let name = ColumnRef::function(format!("#ORDER-{}", count + 1));
					let function = FunctionColumn {
						name: name.clone(),
						expression,
					};
					if function.expression.contains_aggregate() {
						ordering.aggregates.push(function);
					} else {
						ordering.functions.push(function);
					}
					name
				}
			};
			ordering.columns.push(column);
			ordering.directions.push(order.direction);
		}
		Ok(ordering)
	}

	/// Orders the merged result of a composite by its output columns, then
	/// restores the output header.
	fn plan_composite_order_by(
		&self,
		mut node: PlanNode,
		order_by: &[OrderBy],
		header: &[ColumnRef],
	) -> crate::Result<PlanNode> {
		let mut columns = vec![];
		let mut directions = vec![];
		let mut functions = vec![];
		for order in order_by {
			if let Some(idx) = position(&order.expression, header.len())? {
				columns.push(header[idx].clone());
				directions.push(order.direction);
				continue;
			}
			let column = match &order.expression {
				Expression::Column(column) => self.resolve_output_column(column, header)?,
				other => {
					let expression = self.qualify_output(other.clone(), header)?;
					let name = ColumnRef::function(format!("#ORDER-{}", functions.len() + 1));
					functions.push(FunctionColumn {
						name: name.clone(),
						expression,
					});
					name
				}
			};
			columns.push(column);
			directions.push(order.direction);
		}

		if !functions.is_empty() {
			node = PlanNode::single(
				node,
				SingleOp::Functions {
					functions,
				},
			);
		}
		if !columns.is_empty() {
			node = PlanNode::single(
				node,
				SingleOp::Sort {
					columns,
					directions,
				},
			);
		}
		Ok(project(node, header.to_vec(), header.to_vec()))
	}

	fn resolve_output_column(&self, reference: &ColumnRef, header: &[ColumnRef]) -> crate::Result<ColumnRef> {
		let mut found = None;
		for column in header {
			if !column_matches(reference, column, self.config) {
				continue;
			}
			if found.is_some() {
				return_error!(query::ambiguous_column(reference));
			}
			found = Some(column.clone());
		}
		match found {
			Some(column) => Ok(column),
			None => Err(PlanError::OrderByNotResolved {
				name: reference.to_string(),
			}
			.into()),
		}
	}

	fn qualify_output(&self, expression: Expression, header: &[ColumnRef]) -> crate::Result<Expression> {
		match expression {
			Expression::Column(column) => Ok(Expression::Column(self.resolve_output_column(&column, header)?)),
			other => other.try_map_children(|child| self.qualify_output(child, header)),
		}
	}

	/// Resolves every column reference of an expression and plans its nested
	/// SELECTs. With `aliases`, an unqualified reference naming exactly one
	/// SELECT alias resolves to that column.
	fn qualify(
		&self,
		expression: Expression,
		from_set: &FromSet<'_>,
		aliases: Option<&ColumnSet>,
	) -> crate::Result<Expression> {
		match expression {
			Expression::Column(column) => {
				if let Some(aliases) = aliases {
					if let Some(target) = aliases.resolve_alias(&column, self.config)? {
						return Ok(Expression::Column(target.internal.clone()));
					}
				}
				Ok(match from_set.resolve(&column)? {
					Resolved::Local(column) => Expression::Column(column),
					Resolved::Outer(variable) => Expression::Correlated(variable),
				})
			}
			Expression::Select(statement) => {
				let planned = self.plan_select(&statement, Some(from_set))?;
				let id = self.next_cache_id.get();
				self.next_cache_id.set(id + 1);
				Ok(Expression::Query(CachePoint {
					id,
					plan: Box::new(planned.plan),
				}))
			}
			Expression::Call(mut call) => {
				call.aggregate = self.catalog.is_aggregate(&call.name);
				Expression::Call(call).try_map_children(|child| self.qualify(child, from_set, aliases))
			}
			other => other.try_map_children(|child| self.qualify(child, from_set, aliases)),
		}
	}
}

/// The zero based SELECT position an integer ORDER BY literal refers to. A
/// position outside the SELECT list does not resolve.
fn position(expression: &Expression, len: usize) -> crate::Result<Option<usize>> {
	let Expression::Constant(value) = expression else {
		return Ok(None);
	};
	let Some(n) = value.as_exact_integer() else {
		return Ok(None);
	};
	if n >= 1 && (n as usize) <= len {
		Ok(Some(n as usize - 1))
	} else {
		Err(PlanError::OrderByNotResolved {
			name: n.to_string(),
		}
		.into())
	}
}

/// Replaces every aggregate bearing operand of a HAVING expression with a
/// reference to a new group function. Operators are entered, never replaced.
fn extract_having_aggregates(expression: Expression, extra: &mut Vec<FunctionColumn>) -> crate::Result<Expression> {
	match expression {
		Expression::Binary(_)
		| Expression::Not(_)
		| Expression::Negate(_)
		| Expression::Quantified(_)
		| Expression::Tuple(_) => expression.try_map_children(|child| extract_having_aggregates(child, &mut *extra)),
		other if other.contains_aggregate() => {
			let name = ColumnRef::function(format!("HAVINGAG_{}", extra.len() + 1));
			extra.push(FunctionColumn {
				name: name.clone(),
				expression: other,
			});
			Ok(Expression::Column(name))
		}
		other => Ok(other),
	}
}

fn apply_ordering(mut node: PlanNode, ordering: Ordering) -> PlanNode {
	if ordering.columns.is_empty() {
		return node;
	}
	if !ordering.functions.is_empty() {
		node = PlanNode::single(
			node,
			SingleOp::Functions {
				functions: ordering.functions,
			},
		);
	}
	PlanNode::single(
		node,
		SingleOp::Sort {
			columns: ordering.columns,
			directions: ordering.directions,
		},
	)
}

fn project(node: PlanNode, columns: Vec<ColumnRef>, aliases: Vec<ColumnRef>) -> PlanNode {
	if columns.is_empty() {
		return node;
	}
	PlanNode::single(
		node,
		SingleOp::Project {
			columns,
			aliases,
			given_name: None,
		},
	)
}
