// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::TableName;

use crate::{
	expression::CorrelatedVariable,
	plan::{FetchNode, PlanNode},
};

impl PlanNode {
	/// Every base table this plan reads, including tables reached through
	/// views and through sub-queries embedded in expressions. Children are
	/// visited left then right; each table is reported once.
	pub fn discover_table_names(&self, acc: &mut Vec<TableName>) {
		match self {
			PlanNode::Fetch(FetchNode::Table {
				name,
				..
			}) => {
				if !acc.contains(name) {
					acc.push(name.clone());
				}
			}
			PlanNode::Fetch(FetchNode::View {
				plan,
				..
			}) => plan.discover_table_names(acc),
			PlanNode::Fetch(FetchNode::SingleRow) => {}
			PlanNode::Single(_) | PlanNode::Branch(_) => {
				for child in self.children() {
					child.discover_table_names(acc);
				}
				for expression in self.expressions() {
					expression.discover_table_names(acc);
				}
			}
		}
	}

	/// Correlated variables bound `level` queries out from this plan. Nested
	/// plans are searched one level deeper.
	pub fn discover_correlated_variables(&self, level: usize, acc: &mut Vec<CorrelatedVariable>) {
		for child in self.children() {
			child.discover_correlated_variables(level, acc);
		}
		for expression in self.expressions() {
			expression.discover_correlated_variables(level, acc);
		}
		if let PlanNode::Fetch(FetchNode::View {
			plan,
			..
		}) = self
		{
			plan.discover_correlated_variables(level, acc);
		}
	}

	/// Whether evaluating this plan depends on a row of a query more than
	/// `depth` levels out.
	pub fn references_outer(&self, depth: usize) -> bool {
		self.children().iter().any(|child| child.references_outer(depth))
			|| self.expressions().iter().any(|expression| expression.references_outer(depth))
	}

	/// Whether this plan, used as a sub-query, must be re-evaluated per row of
	/// an enclosing query.
	pub fn is_correlated(&self) -> bool {
		self.references_outer(0)
	}
}

#[cfg(test)]
mod tests {
	use quarry_core::ColumnRef;

	use crate::{
		expression::{CachePoint, CorrelatedVariable, Expression, Operator},
		plan::{BranchOp, PlanNode, SingleOp},
	};

	fn correlated(level: usize, column: &str) -> Expression {
		Expression::Correlated(CorrelatedVariable {
			level,
			column: ColumnRef::from(column),
		})
	}

	fn filter(child: PlanNode, predicate: Expression) -> PlanNode {
		PlanNode::single(
			child,
			SingleOp::FunctionalSelect {
				predicate,
			},
		)
	}

	fn table(name: &str) -> PlanNode {
		PlanNode::table(quarry_core::TableName::new(name), None)
	}

	#[test]
	fn test_tables_left_then_right_and_subqueries() {
		let sub = filter(table("c"), Expression::binary(Expression::column("c.x"), Operator::Gt, correlated(1, "a.x")));
		let predicate = Expression::binary(
			Expression::column("a.x"),
			Operator::Equal,
			Expression::Query(CachePoint {
				id: 1,
				plan: Box::new(sub),
			}),
		);
		let plan = filter(PlanNode::branch(table("a"), table("b"), BranchOp::NaturalJoin), predicate);

		let mut tables = vec![];
		plan.discover_table_names(&mut tables);
		let names: Vec<String> = tables.iter().map(ToString::to_string).collect();
		assert_eq!(names, vec!["a", "b", "c"]);
	}

	#[test]
	fn test_correlated_levels() {
		let inner = filter(table("c"), Expression::binary(Expression::column("c.x"), Operator::Equal, correlated(2, "a.x")));
		let middle = filter(
			table("b"),
			Expression::binary(
				correlated(1, "a.y"),
				Operator::Equal,
				Expression::Query(CachePoint {
					id: 2,
					plan: Box::new(inner),
				}),
			),
		);

		let mut level1 = vec![];
		middle.discover_correlated_variables(1, &mut level1);
		let columns: Vec<String> = level1.iter().map(|v| v.column.to_string()).collect();
		assert_eq!(columns, vec!["a.y", "a.x"]);
		assert!(middle.is_correlated());

		let uncorrelated = filter(table("b"), Expression::binary(Expression::column("b.x"), Operator::Gt, Expression::constant(1)));
		assert!(!uncorrelated.is_correlated());
	}
}
