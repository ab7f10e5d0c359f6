// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::rc::Rc;

use indexmap::IndexSet;
use quarry_core::Table;
use quarry_sql::expression::{
	BinaryExpression, CachePoint, CallExpression, Expression, Operator, QuantifiedExpression,
};
use quarry_type::{GetType, Value, error::diagnostic::engine, return_error};

use crate::{
	context::{ExecutionContext, OuterRow},
	evaluate::Evaluate,
	function::{AggregateFunctionContext, ScalarFunctionContext},
};

mod operator;
mod pattern;

pub(crate) use operator::{compare, quantified_match};

/// What column references of an expression read from.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'t> {
	/// No row; only constants and correlated references can be evaluated.
	Empty,
	Row {
		table: &'t Table,
		row: usize,
	},
	/// A group of rows. Aggregates run over `rows`; plain column references
	/// read the representative row, which is absent for an empty input.
	Group {
		table: &'t Table,
		rows: &'t [usize],
		representative: Option<usize>,
	},
}

impl<'t> Scope<'t> {
	fn outer_row(&self) -> OuterRow {
		let (table, row) = match *self {
			Scope::Empty => return OuterRow::default(),
			Scope::Row {
				table,
				row,
			} => (table, Some(row)),
			Scope::Group {
				table,
				representative,
				..
			} => (table, representative),
		};
		OuterRow {
			columns: table.column_names().cloned().collect(),
			values: match row {
				Some(row) => table.row(row),
				None => vec![Value::Undefined; table.column_count()],
			},
		}
	}
}

/// Evaluates `expression` to a single value.
pub fn evaluate(ctx: &ExecutionContext<'_>, expression: &Expression, scope: Scope<'_>) -> crate::Result<Value> {
	match expression {
		Expression::Constant(value) => Ok(value.clone()),
		Expression::Column(column) => match scope {
			Scope::Empty => return_error!(engine::column_not_in_frame(column)),
			Scope::Row {
				table,
				row,
			} => {
				let idx = table.find_column(column, ctx.config())?;
				Ok(table.value(row, idx).clone())
			}
			Scope::Group {
				table,
				representative,
				..
			} => {
				let idx = table.find_column(column, ctx.config())?;
				Ok(representative.map_or(Value::Undefined, |row| table.value(row, idx).clone()))
			}
		},
		Expression::Correlated(variable) => ctx.correlated(variable),
		Expression::Binary(BinaryExpression {
			left,
			operator,
			right,
		}) => match operator {
			Operator::And | Operator::Or => logical(ctx, *operator, left, right, scope),
			Operator::Like | Operator::NotLike | Operator::Regexp => {
				let value = evaluate(ctx, left, scope)?;
				let pattern = evaluate(ctx, right, scope)?;
				pattern::matches(ctx, *operator, &value, &pattern)
			}
			operator => {
				let l = evaluate(ctx, left, scope)?;
				let r = evaluate(ctx, right, scope)?;
				operator::binary(*operator, &l, &r)
			}
		},
		Expression::Quantified(quantified) => quantified_expression(ctx, quantified, scope),
		Expression::Not(inner) => match evaluate(ctx, inner, scope)? {
			Value::Undefined => Ok(Value::Undefined),
			Value::Boolean(b) => Ok(Value::Boolean(!b)),
			other => return_error!(engine::type_mismatch("NOT", other.get_type(), other.get_type())),
		},
		Expression::Negate(inner) => operator::negate(&evaluate(ctx, inner, scope)?),
		Expression::Call(call) if call.is_aggregate() => aggregate(ctx, call, scope),
		Expression::Call(call) => {
			let args = call.args.iter().map(|arg| evaluate(ctx, arg, scope)).collect::<crate::Result<Vec<_>>>()?;
			let Some(function) = ctx.functions().get_scalar(&call.name) else {
				return_error!(engine::function_not_found(&call.name));
			};
			function.scalar(ScalarFunctionContext {
				name: &call.name,
				args: &args,
			})
		}
		Expression::Tuple(items) => match items.as_slice() {
			[item] => evaluate(ctx, item, scope),
			items => return_error!(engine::quantified_arity(items.len(), 1)),
		},
		Expression::Select(_) => return_error!(engine::unplanned_subquery()),
		Expression::Query(cache_point) => {
			let table = evaluate_query(ctx, cache_point, scope)?;
			if table.column_count() != 1 || table.row_count() > 1 {
				return_error!(engine::scalar_subquery_cardinality(table.row_count(), table.column_count()));
			}
			Ok(if table.is_empty() {
				Value::Undefined
			} else {
				table.value(0, 0).clone()
			})
		}
	}
}

/// Whether `predicate` holds. Undefined and false both reject.
pub fn is_true(ctx: &ExecutionContext<'_>, predicate: &Expression, scope: Scope<'_>) -> crate::Result<bool> {
	Ok(matches!(evaluate(ctx, predicate, scope)?, Value::Boolean(true)))
}

/// Evaluates a planned sub-query for the row in `scope`. Results of
/// non-correlated sub-queries are cached for the rest of the evaluation.
pub fn evaluate_query(
	ctx: &ExecutionContext<'_>,
	cache_point: &CachePoint,
	scope: Scope<'_>,
) -> crate::Result<Rc<Table>> {
	if let Some(table) = ctx.cached(cache_point.id) {
		return Ok(table);
	}
	let correlated = cache_point.plan.is_correlated();
	let table = Rc::new(ctx.with_outer_row(scope.outer_row(), || cache_point.plan.evaluate(ctx))?);
	if !correlated {
		ctx.cache(cache_point.id, table.clone());
	}
	Ok(table)
}

fn logical(
	ctx: &ExecutionContext<'_>,
	operator: Operator,
	left: &Expression,
	right: &Expression,
	scope: Scope<'_>,
) -> crate::Result<Value> {
	let short_circuit = operator == Operator::Or;
	let l = truth(operator, evaluate(ctx, left, scope)?)?;
	if l == Some(short_circuit) {
		return Ok(Value::Boolean(short_circuit));
	}
	let r = truth(operator, evaluate(ctx, right, scope)?)?;
	Ok(match (l, r) {
		(_, Some(r)) if r == short_circuit => Value::Boolean(short_circuit),
		(Some(_), Some(_)) => Value::Boolean(!short_circuit),
		_ => Value::Undefined,
	})
}

fn truth(operator: Operator, value: Value) -> crate::Result<Option<bool>> {
	match value {
		Value::Undefined => Ok(None),
		Value::Boolean(b) => Ok(Some(b)),
		other => return_error!(engine::type_mismatch(operator, other.get_type(), other.get_type())),
	}
}

fn aggregate(ctx: &ExecutionContext<'_>, call: &CallExpression, scope: Scope<'_>) -> crate::Result<Value> {
	let Scope::Group {
		table,
		rows,
		..
	} = scope
	else {
		return_error!(engine::aggregate_outside_group(&call.name));
	};
	let Some(mut function) = ctx.functions().get_aggregate(&call.name) else {
		return_error!(engine::function_not_found(&call.name));
	};

	let mut seen = IndexSet::new();
	for &row in rows {
		let args = call
			.args
			.iter()
			.map(|arg| {
				evaluate(
					ctx,
					arg,
					Scope::Row {
						table,
						row,
					},
				)
			})
			.collect::<crate::Result<Vec<_>>>()?;
		if call.distinct && !seen.insert(args.clone()) {
			continue;
		}
		function.aggregate(AggregateFunctionContext {
			name: &call.name,
			args: &args,
		})?;
	}
	function.finalize()
}

fn quantified_expression(
	ctx: &ExecutionContext<'_>,
	quantified: &QuantifiedExpression,
	scope: Scope<'_>,
) -> crate::Result<Value> {
	let left = match quantified.left.as_ref() {
		Expression::Tuple(items) => {
			items.iter().map(|item| evaluate(ctx, item, scope)).collect::<crate::Result<Vec<_>>>()?
		}
		other => vec![evaluate(ctx, other, scope)?],
	};

	let matched = match quantified.right.as_ref() {
		Expression::Query(cache_point) => {
			let table = evaluate_query(ctx, cache_point, scope)?;
			quantified_match(&left, quantified.operator, quantified.quantifier, table.column_count(), table.rows())?
		}
		Expression::Select(_) => return_error!(engine::unplanned_subquery()),
		Expression::Tuple(items) => {
			let rows = items
				.iter()
				.map(|item| evaluate(ctx, item, scope).map(|value| vec![value]))
				.collect::<crate::Result<Vec<_>>>()?;
			quantified_match(&left, quantified.operator, quantified.quantifier, 1, rows)?
		}
		other => {
			let value = evaluate(ctx, other, scope)?;
			quantified_match(&left, quantified.operator, quantified.quantifier, 1, [vec![value]])?
		}
	};
	Ok(Value::Boolean(matched))
}
