// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, JoinType, SortDirection, TableName, table::SetOperation};

use crate::expression::{Expression, Operator, Quantifier};

/// A logical operator tree. Built once by the planner, never mutated during
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
	Fetch(FetchNode),
	Single(SingleNode),
	Branch(BranchNode),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchNode {
	/// Rows of a base table; columns are requalified by `alias` when given.
	Table {
		name: TableName,
		alias: Option<TableName>,
	},
	/// Rows of a view, computed by its compiled plan.
	View {
		name: TableName,
		alias: Option<TableName>,
		plan: Box<PlanNode>,
	},
	/// One row without columns.
	SingleRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleNode {
	pub child: Box<PlanNode>,
	pub op: SingleOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionColumn {
	pub name: ColumnRef,
	pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SingleOp {
	/// Keeps the rows for which `predicate` is true.
	FunctionalSelect {
		predicate: Expression,
	},
	/// `predicate` references no column of the child; it is evaluated once.
	ConstantSelect {
		predicate: Expression,
	},
	/// `<column-or-constant> <LIKE|NOT LIKE|REGEXP> <constant>`.
	PatternSelect {
		predicate: Expression,
	},
	/// Keeps the rows where every column equals its value.
	MultiColumnEquiSelect {
		columns: Vec<ColumnRef>,
		values: Vec<Expression>,
	},
	/// Appends one computed column per function.
	Functions {
		functions: Vec<FunctionColumn>,
	},
	/// One row per group: the representative row followed by the functions
	/// computed over the group. Without `group_by` the whole input is one
	/// group.
	Group {
		group_by: Vec<ColumnRef>,
		group_max: Option<ColumnRef>,
		functions: Vec<FunctionColumn>,
	},
	Sort {
		columns: Vec<ColumnRef>,
		directions: Vec<SortDirection>,
	},
	/// Keeps the first row of each distinct combination of `columns`.
	Distinct {
		columns: Vec<ColumnRef>,
	},
	/// Picks `columns` and names them `aliases`. A `given_name` requalifies
	/// every output column.
	Project {
		columns: Vec<ColumnRef>,
		aliases: Vec<ColumnRef>,
		given_name: Option<TableName>,
	},
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode {
	pub left: Box<PlanNode>,
	pub right: Box<PlanNode>,
	pub op: BranchOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BranchOp {
	/// `column <operator> expression`, the column from the left side and the
	/// expression over the right side.
	Join {
		column: ColumnRef,
		operator: Operator,
		expression: Expression,
	},
	/// Cartesian product.
	NaturalJoin,
	OuterJoin {
		kind: JoinType,
		on: Expression,
	},
	Composite {
		operation: SetOperation,
		all: bool,
	},
	/// `(columns) <operator> ANY|ALL (right)` over a right side that does not
	/// depend on the left rows.
	NonCorrelatedAnyAll {
		columns: Vec<ColumnRef>,
		operator: Operator,
		quantifier: Quantifier,
	},
}

impl PlanNode {
	pub fn single(child: PlanNode, op: SingleOp) -> PlanNode {
		PlanNode::Single(SingleNode {
			child: Box::new(child),
			op,
		})
	}

	pub fn branch(left: PlanNode, right: PlanNode, op: BranchOp) -> PlanNode {
		PlanNode::Branch(BranchNode {
			left: Box::new(left),
			right: Box::new(right),
			op,
		})
	}

	pub fn table(name: TableName, alias: Option<TableName>) -> PlanNode {
		PlanNode::Fetch(FetchNode::Table {
			name,
			alias,
		})
	}

	pub fn single_row() -> PlanNode {
		PlanNode::Fetch(FetchNode::SingleRow)
	}

	pub fn children(&self) -> Vec<&PlanNode> {
		match self {
			PlanNode::Fetch(_) => vec![],
			PlanNode::Single(single) => vec![&single.child],
			PlanNode::Branch(branch) => vec![&branch.left, &branch.right],
		}
	}

	/// Expressions held by this node itself, not its children.
	pub fn expressions(&self) -> Vec<&Expression> {
		match self {
			PlanNode::Fetch(_) => vec![],
			PlanNode::Single(SingleNode {
				op,
				..
			}) => match op {
				SingleOp::FunctionalSelect {
					predicate,
				}
				| SingleOp::ConstantSelect {
					predicate,
				}
				| SingleOp::PatternSelect {
					predicate,
				} => vec![predicate],
				SingleOp::MultiColumnEquiSelect {
					values,
					..
				} => values.iter().collect(),
				SingleOp::Functions {
					functions,
				}
				| SingleOp::Group {
					functions,
					..
				} => functions.iter().map(|f| &f.expression).collect(),
				SingleOp::Sort {
					..
				}
				| SingleOp::Distinct {
					..
				}
				| SingleOp::Project {
					..
				} => vec![],
			},
			PlanNode::Branch(BranchNode {
				op,
				..
			}) => match op {
				BranchOp::Join {
					expression,
					..
				} => vec![expression],
				BranchOp::OuterJoin {
					on,
					..
				} => vec![on],
				BranchOp::NaturalJoin
				| BranchOp::Composite {
					..
				}
				| BranchOp::NonCorrelatedAnyAll {
					..
				} => vec![],
			},
		}
	}

	/// Requalifies the output of this plan by `name`. The top projection takes
	/// the name; any other top node is wrapped in a new projection over
	/// `header`.
	pub fn with_given_name(self, name: TableName, header: &[ColumnRef]) -> PlanNode {
		match self {
			PlanNode::Single(SingleNode {
				child,
				op: SingleOp::Project {
					columns,
					aliases,
					..
				},
			}) => PlanNode::Single(SingleNode {
				child,
				op: SingleOp::Project {
					columns,
					aliases,
					given_name: Some(name),
				},
			}),
			other => PlanNode::single(
				other,
				SingleOp::Project {
					columns: header.to_vec(),
					aliases: header.to_vec(),
					given_name: Some(name),
				},
			),
		}
	}
}
