// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, JoinType};
use quarry_type::{error::diagnostic::query, return_error};
use smallvec::SmallVec;
use tracing::{debug, instrument, trace};

use crate::{
	expression::{BinaryExpression, Expression, Operator, QuantifiedExpression, Quantifier},
	plan::{BranchOp, PlanNode, SingleOp},
};

type Sources = SmallVec<[usize; 4]>;

#[derive(Debug, Clone, PartialEq)]
pub struct JoinEdge {
	pub kind: JoinType,
	pub on: Option<Expression>,
}

/// The in-progress plan of one from-set entry together with the joins to its
/// left and right neighbors in declared order.
#[derive(Debug)]
pub struct TableSourcePlan {
	pub node: PlanNode,
	/// `None` claims every column.
	columns: Option<Vec<ColumnRef>>,
	pub left_join: Option<JoinEdge>,
	pub right_join: Option<JoinEdge>,
}

#[derive(Debug)]
struct Term {
	predicate: Expression,
	kind: TermKind,
}

#[derive(Debug)]
enum TermKind {
	/// No column of this block.
	Constant,
	Equi {
		source: usize,
		column: ColumnRef,
		value: Expression,
	},
	Pattern {
		source: usize,
	},
	AnyAll {
		source: usize,
		columns: Vec<ColumnRef>,
		operator: Operator,
		quantifier: Quantifier,
		plan: PlanNode,
	},
	Single {
		source: usize,
	},
	Join {
		left: usize,
		right: usize,
		column: ColumnRef,
		operator: Operator,
		expression: Expression,
	},
	Multi,
}

impl TermKind {
	fn single_source(&self) -> Option<usize> {
		match self {
			TermKind::Equi {
				source,
				..
			}
			| TermKind::Pattern {
				source,
			}
			| TermKind::AnyAll {
				source,
				..
			}
			| TermKind::Single {
				source,
			} => Some(*source),
			_ => None,
		}
	}
}

struct JoinGroup {
	node: PlanNode,
	sources: Vec<usize>,
}

/// Plans a search expression over a chain of table sources.
#[derive(Debug, Default)]
pub struct TableSourcePlanner {
	plans: Vec<TableSourcePlan>,
}

impl TableSourcePlanner {
	pub fn new() -> Self {
		Self::default()
	}

	/// A planner over one node that owns every column, used for HAVING.
	pub fn over(node: PlanNode) -> Self {
		Self {
			plans: vec![TableSourcePlan {
				node,
				columns: None,
				left_join: None,
				right_join: None,
			}],
		}
	}

	pub fn add_plan(&mut self, node: PlanNode, columns: Vec<ColumnRef>) {
		self.plans.push(TableSourcePlan {
			node,
			columns: Some(columns),
			left_join: None,
			right_join: None,
		});
	}

	/// Records the join between the plan at `left` and its right neighbor.
	pub fn set_join_info_between(&mut self, left: usize, kind: JoinType, on: Option<Expression>) {
		let edge = JoinEdge {
			kind,
			on,
		};
		if let Some(plan) = self.plans.get_mut(left) {
			plan.right_join = Some(edge.clone());
		}
		if let Some(plan) = self.plans.get_mut(left + 1) {
			plan.left_join = Some(edge);
		}
	}

	pub fn has_outer_joins(&self) -> bool {
		self.plans.iter().any(|p| p.left_join.as_ref().is_some_and(|edge| edge.kind.is_outer()))
	}

	fn source_of(&self, column: &ColumnRef) -> crate::Result<usize> {
		for (idx, plan) in self.plans.iter().enumerate() {
			match &plan.columns {
				None => return Ok(idx),
				Some(columns) if columns.contains(column) => return Ok(idx),
				Some(_) => {}
			}
		}
		return_error!(query::column_not_found(column))
	}

	/// Sources touched by an expression. Level one correlated variables of
	/// embedded sub-queries are columns of this block.
	fn sources(&self, expression: &Expression) -> crate::Result<Sources> {
		let mut sources = Sources::new();
		for column in expression.columns() {
			let source = self.source_of(column)?;
			if !sources.contains(&source) {
				sources.push(source);
			}
		}
		for cache_point in expression.queries() {
			let mut variables = vec![];
			cache_point.plan.discover_correlated_variables(1, &mut variables);
			for variable in variables {
				let source = self.source_of(&variable.column)?;
				if !sources.contains(&source) {
					sources.push(source);
				}
			}
		}
		sources.sort_unstable();
		Ok(sources)
	}

	fn classify(&self, predicate: Expression) -> crate::Result<Term> {
		let sources = self.sources(&predicate)?;
		let kind = match sources.as_slice() {
			[] => TermKind::Constant,
			[source] => classify_single(*source, &predicate),
			[_, _] => self.as_join(&predicate)?.unwrap_or(TermKind::Multi),
			_ => TermKind::Multi,
		};
		Ok(Term {
			predicate,
			kind,
		})
	}

	/// `column <cmp> expression` where the expression only reads the other
	/// source.
	fn as_join(&self, predicate: &Expression) -> crate::Result<Option<TermKind>> {
		let Expression::Binary(BinaryExpression {
			left,
			operator,
			right,
		}) = predicate
		else {
			return Ok(None);
		};
		if !is_join_operator(operator) {
			return Ok(None);
		}

		let candidates = [(left, right, *operator), (right, left, operator.reverse())];
		for (column_side, expression_side, operator) in candidates {
			let Expression::Column(column) = column_side.as_ref() else {
				continue;
			};
			if expression_side.contains_select() {
				continue;
			}
			let column_source = self.source_of(column)?;
			let expression_sources = self.sources(expression_side)?;
			if let [expression_source] = expression_sources.as_slice() {
				if *expression_source != column_source {
					return Ok(Some(TermKind::Join {
						left: column_source,
						right: *expression_source,
						column: column.clone(),
						operator,
						expression: expression_side.as_ref().clone(),
					}));
				}
			}
		}
		Ok(None)
	}

	/// Turns the search expression into filters and joins over the table
	/// sources, merging every source into one node.
	#[instrument(name = "sql::plan::search", level = "trace", skip_all)]
	pub fn plan_search(self, expression: Option<Expression>) -> crate::Result<PlanNode> {
		let terms = expression.map(Expression::split_and).unwrap_or_default();
		let mut classified = Vec::with_capacity(terms.len());
		for term in terms {
			let term = self.classify(term)?;
			trace!(predicate = %term.predicate, kind = ?term.kind, "classified search term");
			classified.push(term);
		}

		if self.has_outer_joins() {
			debug!("planning search over an outer join chain");
			self.plan_outer(classified)
		} else {
			self.plan_inner(classified)
		}
	}

	fn plan_inner(self, terms: Vec<Term>) -> crate::Result<PlanNode> {
		let mut per_source: Vec<Vec<Term>> = self.plans.iter().map(|_| vec![]).collect();
		let mut joins = vec![];
		let mut post = vec![];
		for term in terms {
			let is_join = matches!(term.kind, TermKind::Join { .. });
			match term.kind.single_source() {
				_ if is_join => joins.push(term),
				Some(source) => per_source[source].push(term),
				None => post.push(term),
			}
		}

		let mut groups: Vec<JoinGroup> = self
			.plans
			.into_iter()
			.zip(per_source)
			.enumerate()
			.map(|(idx, (plan, terms))| JoinGroup {
				node: apply_single_terms(plan.node, terms),
				sources: vec![idx],
			})
			.collect();

		for term in joins {
			let TermKind::Join {
				left,
				right,
				column,
				operator,
				expression,
			} = term.kind
			else {
				continue;
			};
			let left_group = groups.iter().position(|g| g.sources.contains(&left));
			let right_group = groups.iter().position(|g| g.sources.contains(&right));
			let (Some(left_group), Some(right_group)) = (left_group, right_group) else {
				continue;
			};
			if left_group == right_group {
				post.push(Term {
					predicate: term.predicate,
					kind: TermKind::Multi,
				});
				continue;
			}

			debug!(column = %column, operator = %operator, expression = %expression, "joining sources");
			let left_group = if right_group < left_group {
				left_group - 1
			} else {
				left_group
			};
			let right_group = groups.remove(right_group);
			let target = &mut groups[left_group];
			let node = std::mem::replace(&mut target.node, PlanNode::single_row());
			target.node = PlanNode::branch(
				node,
				right_group.node,
				BranchOp::Join {
					column,
					operator,
					expression,
				},
			);
			target.sources.extend(right_group.sources);
		}

		let mut groups = groups.into_iter();
		let mut node = groups.next().map(|g| g.node).unwrap_or_else(PlanNode::single_row);
		for group in groups {
			node = PlanNode::branch(node, group.node, BranchOp::NaturalJoin);
		}
		Ok(apply_post_terms(node, post))
	}

	fn plan_outer(self, terms: Vec<Term>) -> crate::Result<PlanNode> {
		let mut null_supplying = vec![false; self.plans.len()];
		for (idx, plan) in self.plans.iter().enumerate() {
			match plan.left_join.as_ref().map(|edge| edge.kind) {
				Some(JoinType::LeftOuter) => null_supplying[idx] = true,
				Some(JoinType::RightOuter) => null_supplying[..idx].iter_mut().for_each(|n| *n = true),
				Some(JoinType::FullOuter) => null_supplying[..=idx].iter_mut().for_each(|n| *n = true),
				_ => {}
			}
		}

		let mut per_source: Vec<Vec<Term>> = self.plans.iter().map(|_| vec![]).collect();
		let mut post = vec![];
		for term in terms {
			match term.kind.single_source() {
				Some(source) if !null_supplying[source] => per_source[source].push(term),
				Some(_) => post.push(Term {
					predicate: term.predicate,
					kind: TermKind::Multi,
				}),
				None if matches!(term.kind, TermKind::Constant) => post.push(term),
				None => post.push(Term {
					predicate: term.predicate,
					kind: TermKind::Multi,
				}),
			}
		}

		let mut chain = self.plans.into_iter().zip(per_source);
		let Some((first, first_terms)) = chain.next() else {
			return Ok(apply_post_terms(PlanNode::single_row(), post));
		};
		let mut node = apply_single_terms(first.node, first_terms);
		for (plan, terms) in chain {
			let right = apply_single_terms(plan.node, terms);
			node = match plan.left_join {
				Some(JoinEdge {
					kind,
					on: Some(on),
				}) if kind.is_outer() => PlanNode::branch(
					node,
					right,
					BranchOp::OuterJoin {
						kind,
						on,
					},
				),
				Some(JoinEdge {
					on: Some(on),
					..
				}) => PlanNode::single(
					PlanNode::branch(node, right, BranchOp::NaturalJoin),
					SingleOp::FunctionalSelect {
						predicate: on,
					},
				),
				_ => PlanNode::branch(node, right, BranchOp::NaturalJoin),
			};
		}
		Ok(apply_post_terms(node, post))
	}
}

fn is_join_operator(operator: &Operator) -> bool {
	matches!(
		operator,
		Operator::Equal | Operator::NotEqual | Operator::Lt | Operator::LtEq | Operator::Gt | Operator::GtEq
	)
}

fn is_pattern_shape(predicate: &Expression) -> bool {
	match predicate {
		Expression::Binary(BinaryExpression {
			left,
			operator,
			right,
		}) => operator.is_pattern() && right.is_constant() && (left.is_column() || left.is_constant()),
		_ => false,
	}
}

fn as_equi(predicate: &Expression) -> Option<(ColumnRef, Expression)> {
	let Expression::Binary(BinaryExpression {
		left,
		operator: Operator::Equal,
		right,
	}) = predicate
	else {
		return None;
	};
	match (left.as_ref(), right.as_ref()) {
		(Expression::Column(column), value) if value.is_constant() => Some((column.clone(), value.clone())),
		(value, Expression::Column(column)) if value.is_constant() => Some((column.clone(), value.clone())),
		_ => None,
	}
}

fn classify_single(source: usize, predicate: &Expression) -> TermKind {
	if let Some((column, value)) = as_equi(predicate) {
		return TermKind::Equi {
			source,
			column,
			value,
		};
	}
	if is_pattern_shape(predicate) {
		return TermKind::Pattern {
			source,
		};
	}
	if let Expression::Quantified(QuantifiedExpression {
		left,
		operator,
		quantifier,
		right,
	}) = predicate
	{
		if let Expression::Query(cache_point) = right.as_ref() {
			let columns = match left.as_ref() {
				Expression::Column(column) => Some(vec![column.clone()]),
				Expression::Tuple(items) => items.iter().map(|item| item.as_column().cloned()).collect(),
				_ => None,
			};
			if let Some(columns) = columns {
				if !cache_point.plan.is_correlated() {
					return TermKind::AnyAll {
						source,
						columns,
						operator: *operator,
						quantifier: *quantifier,
						plan: cache_point.plan.as_ref().clone(),
					};
				}
			}
		}
	}
	TermKind::Single {
		source,
	}
}

/// Filters of one source: equalities first, then patterns, quantified
/// comparisons and everything else.
fn apply_single_terms(mut node: PlanNode, terms: Vec<Term>) -> PlanNode {
	let mut columns = vec![];
	let mut values = vec![];
	let mut rest = vec![];
	for term in terms {
		match term.kind {
			TermKind::Equi {
				column,
				value,
				..
			} => {
				columns.push(column);
				values.push(value);
			}
			_ => rest.push(term),
		}
	}
	if !columns.is_empty() {
		node = PlanNode::single(
			node,
			SingleOp::MultiColumnEquiSelect {
				columns,
				values,
			},
		);
	}

	rest.sort_by_key(|term| match term.kind {
		TermKind::Pattern {
			..
		} => 0,
		TermKind::AnyAll {
			..
		} => 1,
		_ => 2,
	});
	for term in rest {
		node = match term.kind {
			TermKind::Pattern {
				..
			} => PlanNode::single(
				node,
				SingleOp::PatternSelect {
					predicate: term.predicate,
				},
			),
			TermKind::AnyAll {
				columns,
				operator,
				quantifier,
				plan,
				..
			} => PlanNode::branch(
				node,
				plan,
				BranchOp::NonCorrelatedAnyAll {
					columns,
					operator,
					quantifier,
				},
			),
			_ => PlanNode::single(
				node,
				SingleOp::FunctionalSelect {
					predicate: term.predicate,
				},
			),
		};
	}
	node
}

fn apply_post_terms(mut node: PlanNode, terms: Vec<Term>) -> PlanNode {
	for term in terms {
		let op = match term.kind {
			TermKind::Constant if is_pattern_shape(&term.predicate) => SingleOp::PatternSelect {
				predicate: term.predicate,
			},
			TermKind::Constant => SingleOp::ConstantSelect {
				predicate: term.predicate,
			},
			_ => SingleOp::FunctionalSelect {
				predicate: term.predicate,
			},
		};
		node = PlanNode::single(node, op);
	}
	node
}
