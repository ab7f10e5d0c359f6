// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use quarry_core::ColumnRef;
use quarry_type::Value;

pub use operator::{Operator, Quantifier};

use crate::{plan::PlanNode, select::SelectStatement};

mod operator;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Constant(Value),

	Column(ColumnRef),

	/// A reference bound to a row of an enclosing query.
	Correlated(CorrelatedVariable),

	Binary(BinaryExpression),

	Quantified(QuantifiedExpression),

	Not(Box<Expression>),

	Negate(Box<Expression>),

	Call(CallExpression),

	Tuple(Vec<Expression>),

	/// A nested SELECT that has not been planned yet.
	Select(Box<SelectStatement>),

	/// A planned nested SELECT.
	Query(CachePoint),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelatedVariable {
	/// 1 refers to the immediately enclosing query.
	pub level: usize,
	pub column: ColumnRef,
}

impl Display for CorrelatedVariable {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}^{}", self.column, self.level)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
	pub left: Box<Expression>,
	pub operator: Operator,
	pub right: Box<Expression>,
}

/// `left <operator> ANY|ALL right` where `right` is a sub-query or a list.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantifiedExpression {
	pub left: Box<Expression>,
	pub operator: Operator,
	pub quantifier: Quantifier,
	pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
	pub name: String,
	/// Empty for `count(*)`.
	pub args: Vec<Expression>,
	pub distinct: bool,
	/// Set from the catalog while planning; built in aggregates until then.
	pub aggregate: bool,
}

impl CallExpression {
	pub fn is_aggregate(&self) -> bool {
		self.aggregate
	}
}

/// A planned sub-query. Non-correlated results are cached by `id` for the
/// duration of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CachePoint {
	pub id: usize,
	pub plan: Box<PlanNode>,
}

pub const AGGREGATE_FUNCTIONS: [&str; 5] = ["count", "sum", "avg", "min", "max"];

pub fn is_aggregate_function(name: &str) -> bool {
	AGGREGATE_FUNCTIONS.iter().any(|f| f.eq_ignore_ascii_case(name))
}

impl Expression {
	pub fn constant(value: impl Into<Value>) -> Self {
		Expression::Constant(value.into())
	}

	pub fn column(name: impl Into<ColumnRef>) -> Self {
		Expression::Column(name.into())
	}

	pub fn binary(left: Expression, operator: Operator, right: Expression) -> Self {
		Expression::Binary(BinaryExpression {
			left: Box::new(left),
			operator,
			right: Box::new(right),
		})
	}

	pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
		let name = name.into();
		Expression::Call(CallExpression {
			aggregate: is_aggregate_function(&name),
			name,
			args,
			distinct: false,
		})
	}

	pub fn count_star() -> Self {
		Expression::call("count", vec![])
	}

	pub fn quantified(left: Expression, operator: Operator, quantifier: Quantifier, right: Expression) -> Self {
		Expression::Quantified(QuantifiedExpression {
			left: Box::new(left),
			operator,
			quantifier,
			right: Box::new(right),
		})
	}

	pub fn subquery(statement: SelectStatement) -> Self {
		Expression::Select(Box::new(statement))
	}

	pub fn and(self, other: Expression) -> Self {
		Expression::binary(self, Operator::And, other)
	}

	pub fn as_column(&self) -> Option<&ColumnRef> {
		match self {
			Expression::Column(column) => Some(column),
			_ => None,
		}
	}

	pub fn is_column(&self) -> bool {
		matches!(self, Expression::Column(_))
	}

	pub fn children(&self) -> Vec<&Expression> {
		match self {
			Expression::Constant(_)
			| Expression::Column(_)
			| Expression::Correlated(_)
			| Expression::Select(_)
			| Expression::Query(_) => vec![],
			Expression::Binary(binary) => vec![&binary.left, &binary.right],
			Expression::Quantified(quantified) => vec![&quantified.left, &quantified.right],
			Expression::Not(inner) | Expression::Negate(inner) => vec![inner],
			Expression::Call(call) => call.args.iter().collect(),
			Expression::Tuple(items) => items.iter().collect(),
		}
	}

	/// Rebuilds this node with every direct child passed through `f`.
	pub fn try_map_children<F>(self, mut f: F) -> crate::Result<Expression>
	where
		F: FnMut(Expression) -> crate::Result<Expression>,
	{
		Ok(match self {
			Expression::Binary(BinaryExpression {
				left,
				operator,
				right,
			}) => Expression::Binary(BinaryExpression {
				left: Box::new(f(*left)?),
				operator,
				right: Box::new(f(*right)?),
			}),
			Expression::Quantified(QuantifiedExpression {
				left,
				operator,
				quantifier,
				right,
			}) => Expression::Quantified(QuantifiedExpression {
				left: Box::new(f(*left)?),
				operator,
				quantifier,
				right: Box::new(f(*right)?),
			}),
			Expression::Not(inner) => Expression::Not(Box::new(f(*inner)?)),
			Expression::Negate(inner) => Expression::Negate(Box::new(f(*inner)?)),
			Expression::Call(CallExpression {
				name,
				args,
				distinct,
				aggregate,
			}) => Expression::Call(CallExpression {
				name,
				args: args.into_iter().map(&mut f).collect::<crate::Result<_>>()?,
				distinct,
				aggregate,
			}),
			Expression::Tuple(items) => {
				Expression::Tuple(items.into_iter().map(&mut f).collect::<crate::Result<_>>()?)
			}
			leaf => leaf,
		})
	}

	/// Visits this expression and its descendants, pre-order. Nested plans are
	/// not entered.
	pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
		visit(self);
		for child in self.children() {
			child.walk(visit);
		}
	}

	/// Column references of this block, excluding correlated references and
	/// anything inside nested queries.
	pub fn columns(&self) -> Vec<&ColumnRef> {
		let mut result = Vec::new();
		self.walk(&mut |e| {
			if let Expression::Column(column) = e {
				result.push(column);
			}
		});
		result
	}

	pub fn contains_aggregate(&self) -> bool {
		let mut found = false;
		self.walk(&mut |e| {
			if let Expression::Call(call) = e {
				found |= call.is_aggregate();
			}
		});
		found
	}

	pub fn contains_select(&self) -> bool {
		let mut found = false;
		self.walk(&mut |e| found |= matches!(e, Expression::Select(_) | Expression::Query(_)));
		found
	}

	/// Planned sub-queries directly reachable from this expression.
	pub fn queries(&self) -> Vec<&CachePoint> {
		let mut result = Vec::new();
		self.walk(&mut |e| {
			if let Expression::Query(cache_point) = e {
				result.push(cache_point);
			}
		});
		result
	}

	/// Free of columns of the current block and of sub-queries.
	pub fn is_constant(&self) -> bool {
		let mut constant = true;
		self.walk(&mut |e| {
			constant &= !matches!(e, Expression::Column(_) | Expression::Select(_) | Expression::Query(_));
		});
		constant
	}

	/// Splits a conjunction into its terms.
	pub fn split_and(self) -> Vec<Expression> {
		match self {
			Expression::Binary(BinaryExpression {
				left,
				operator: Operator::And,
				right,
			}) => {
				let mut terms = left.split_and();
				terms.extend(right.split_and());
				terms
			}
			other => vec![other],
		}
	}

	pub fn join_and(terms: impl IntoIterator<Item = Expression>) -> Option<Expression> {
		terms.into_iter().reduce(Expression::and)
	}

	/// Correlated variables at `level`, including those of nested plans at the
	/// matching deeper level.
	pub fn discover_correlated_variables(&self, level: usize, acc: &mut Vec<CorrelatedVariable>) {
		self.walk(&mut |e| match e {
			Expression::Correlated(variable) if variable.level == level => {
				if !acc.contains(variable) {
					acc.push(variable.clone());
				}
			}
			Expression::Query(cache_point) => cache_point.plan.discover_correlated_variables(level + 1, acc),
			_ => {}
		});
	}

	/// Whether anything in this expression is bound to a row more than `depth`
	/// levels out.
	pub fn references_outer(&self, depth: usize) -> bool {
		let mut found = false;
		self.walk(&mut |e| match e {
			Expression::Correlated(variable) => found |= variable.level > depth,
			Expression::Query(cache_point) => found |= cache_point.plan.references_outer(depth + 1),
			_ => {}
		});
		found
	}

	pub fn discover_table_names(&self, acc: &mut Vec<quarry_core::TableName>) {
		for cache_point in self.queries() {
			cache_point.plan.discover_table_names(acc);
		}
	}
}

impl Display for Expression {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Expression::Constant(Value::Utf8(s)) => write!(f, "'{}'", s),
			Expression::Constant(value) => Display::fmt(value, f),
			Expression::Column(column) => Display::fmt(column, f),
			Expression::Correlated(variable) => Display::fmt(variable, f),
			Expression::Binary(BinaryExpression {
				left,
				operator,
				right,
			}) => write!(f, "({} {} {})", left, operator, right),
			Expression::Quantified(QuantifiedExpression {
				left,
				operator,
				quantifier,
				right,
			}) => write!(f, "({} {} {} {})", left, operator, quantifier, right),
			Expression::Not(inner) => write!(f, "(NOT {})", inner),
			Expression::Negate(inner) => write!(f, "(-{})", inner),
			Expression::Call(call) => Display::fmt(call, f),
			Expression::Tuple(items) => {
				let items = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
				write!(f, "({})", items)
			}
			Expression::Select(_) => f.write_str("(SELECT ...)"),
			Expression::Query(cache_point) => write!(f, "QUERY#{}", cache_point.id),
		}
	}
}

impl Display for CallExpression {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if self.args.is_empty() && self.name.eq_ignore_ascii_case("count") {
			return write!(f, "{}(*)", self.name);
		}
		let args = self.args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
		if self.distinct {
			write!(f, "{}(DISTINCT {})", self.name, args)
		} else {
			write!(f, "{}({})", self.name, args)
		}
	}
}
