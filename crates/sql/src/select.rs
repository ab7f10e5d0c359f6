// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The SELECT description consumed by the planner. It is produced by a parser
//! or built programmatically; names in it are not yet resolved.

use quarry_core::{ColumnRef, JoinType, SortDirection, TableName, table::SetOperation};

use crate::expression::Expression;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStatement {
	pub distinct: bool,
	pub columns: Vec<SelectItem>,
	pub from: FromClause,
	pub filter: Option<Expression>,
	pub group_by: Vec<Expression>,
	/// Picks the representative row of each group: the one holding the
	/// maximum value of this column.
	pub group_max: Option<ColumnRef>,
	pub having: Option<Expression>,
	pub order_by: Vec<OrderBy>,
	pub composite: Option<Composite>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
	Expression {
		expression: Expression,
		alias: Option<String>,
	},
	/// `*` when no table is given, `table.*` otherwise.
	Glob(Option<TableName>),
}

/// The sources of a SELECT in declared order. `joins[i]` links `tables[i]`
/// with `tables[i + 1]`; a comma separated list is a chain of inner joins
/// without ON expressions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FromClause {
	pub tables: Vec<FromTable>,
	pub joins: Vec<JoinClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromTable {
	Table {
		name: TableName,
		alias: Option<String>,
	},
	SubQuery {
		query: Box<SelectStatement>,
		alias: Option<String>,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
	pub kind: JoinType,
	pub on: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
	pub expression: Expression,
	pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
	pub operation: SetOperation,
	pub all: bool,
	pub statement: Box<SelectStatement>,
}

impl SelectStatement {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn distinct(mut self) -> Self {
		self.distinct = true;
		self
	}

	pub fn column(mut self, expression: Expression) -> Self {
		self.columns.push(SelectItem::Expression {
			expression,
			alias: None,
		});
		self
	}

	pub fn column_as(mut self, expression: Expression, alias: impl Into<String>) -> Self {
		self.columns.push(SelectItem::Expression {
			expression,
			alias: Some(alias.into()),
		});
		self
	}

	pub fn glob(mut self) -> Self {
		self.columns.push(SelectItem::Glob(None));
		self
	}

	pub fn glob_of(mut self, table: TableName) -> Self {
		self.columns.push(SelectItem::Glob(Some(table)));
		self
	}

	pub fn from(mut self, table: FromTable) -> Self {
		if !self.from.tables.is_empty() {
			self.from.joins.push(JoinClause {
				kind: JoinType::Inner,
				on: None,
			});
		}
		self.from.tables.push(table);
		self
	}

	pub fn join(mut self, kind: JoinType, table: FromTable, on: Option<Expression>) -> Self {
		self.from.joins.push(JoinClause {
			kind,
			on,
		});
		self.from.tables.push(table);
		self
	}

	pub fn filter(mut self, expression: Expression) -> Self {
		self.filter = Some(expression);
		self
	}

	pub fn group_by(mut self, expression: Expression) -> Self {
		self.group_by.push(expression);
		self
	}

	pub fn group_max(mut self, column: impl Into<ColumnRef>) -> Self {
		self.group_max = Some(column.into());
		self
	}

	pub fn having(mut self, expression: Expression) -> Self {
		self.having = Some(expression);
		self
	}

	pub fn order_by(mut self, expression: Expression, direction: SortDirection) -> Self {
		self.order_by.push(OrderBy {
			expression,
			direction,
		});
		self
	}

	pub fn composite(mut self, operation: SetOperation, all: bool, statement: SelectStatement) -> Self {
		self.composite = Some(Composite {
			operation,
			all,
			statement: Box::new(statement),
		});
		self
	}
}

impl FromTable {
	pub fn table(name: impl Into<String>) -> Self {
		FromTable::Table {
			name: TableName::new(name),
			alias: None,
		}
	}

	pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
		FromTable::Table {
			name: TableName::new(name),
			alias: Some(alias.into()),
		}
	}

	pub fn subquery(query: SelectStatement, alias: impl Into<String>) -> Self {
		FromTable::SubQuery {
			query: Box::new(query),
			alias: Some(alias.into()),
		}
	}

	pub fn alias(&self) -> Option<&str> {
		match self {
			FromTable::Table {
				alias,
				..
			}
			| FromTable::SubQuery {
				alias,
				..
			} => alias.as_deref(),
		}
	}
}
