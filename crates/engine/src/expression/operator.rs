// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cmp::Ordering;

use quarry_sql::expression::{Operator, Quantifier};
use quarry_type::{GetType, Value, error::diagnostic::engine, return_error};

/// Arithmetic, concatenation and comparison. Logical and pattern operators
/// are evaluated by the caller.
pub(crate) fn binary(operator: Operator, l: &Value, r: &Value) -> crate::Result<Value> {
	match operator {
		Operator::Add | Operator::Subtract | Operator::Multiply | Operator::Divide | Operator::Modulo => {
			arithmetic(operator, l, r)
		}
		Operator::Concat => {
			if l.is_undefined() || r.is_undefined() {
				return Ok(Value::Undefined);
			}
			Ok(Value::utf8(format!("{}{}", l, r)))
		}
		operator => compare(operator, l, r),
	}
}

/// A comparison yields undefined when either side is undefined, except for
/// `IS` and `IS NOT`, which treat undefined as a value.
pub(crate) fn compare(operator: Operator, l: &Value, r: &Value) -> crate::Result<Value> {
	match operator {
		Operator::Is => return Ok(Value::Boolean(is(l, r))),
		Operator::IsNot => return Ok(Value::Boolean(!is(l, r))),
		_ => {}
	}
	if l.is_undefined() || r.is_undefined() {
		return Ok(Value::Undefined);
	}
	let Some(ordering) = l.compare(r) else {
		return_error!(engine::type_mismatch(operator, l.get_type(), r.get_type()));
	};
	let result = match operator {
		Operator::Equal => ordering == Ordering::Equal,
		Operator::NotEqual => ordering != Ordering::Equal,
		Operator::Lt => ordering == Ordering::Less,
		Operator::LtEq => ordering != Ordering::Greater,
		Operator::Gt => ordering == Ordering::Greater,
		Operator::GtEq => ordering != Ordering::Less,
		operator => return_error!(engine::type_mismatch(operator, l.get_type(), r.get_type())),
	};
	Ok(Value::Boolean(result))
}

fn is(l: &Value, r: &Value) -> bool {
	match (l, r) {
		(Value::Undefined, Value::Undefined) => true,
		(Value::Undefined, _) | (_, Value::Undefined) => false,
		(l, r) => l.compare(r) == Some(Ordering::Equal),
	}
}

/// Matches a tuple of values against rows of `width` values. A row matches
/// when every column pair compares true; undefined never matches. `ALL` over
/// no rows holds.
pub(crate) fn quantified_match(
	left: &[Value],
	operator: Operator,
	quantifier: Quantifier,
	width: usize,
	rows: impl IntoIterator<Item = Vec<Value>>,
) -> crate::Result<bool> {
	if left.len() != width {
		return_error!(engine::quantified_arity(left.len(), width));
	}
	for row in rows {
		let mut matched = true;
		for (l, r) in left.iter().zip(&row) {
			if compare(operator, l, r)? != Value::Boolean(true) {
				matched = false;
				break;
			}
		}
		match quantifier {
			Quantifier::Any if matched => return Ok(true),
			Quantifier::All if !matched => return Ok(false),
			_ => {}
		}
	}
	Ok(quantifier == Quantifier::All)
}

fn arithmetic(operator: Operator, l: &Value, r: &Value) -> crate::Result<Value> {
	match (l, r) {
		(Value::Undefined, _) | (_, Value::Undefined) => Ok(Value::Undefined),
		(Value::Int8(l), Value::Int8(r)) => integer(operator, *l, *r),
		(l, r) if l.is_number() && r.is_number() => {
			let (l, r) = (l.as_f64().unwrap_or_default(), r.as_f64().unwrap_or_default());
			float(operator, l, r)
		}
		(l, r) => return_error!(engine::type_mismatch(operator, l.get_type(), r.get_type())),
	}
}

/// Exact integer arithmetic. Overflow and inexact division continue in
/// floating point.
fn integer(operator: Operator, l: i64, r: i64) -> crate::Result<Value> {
	let result = match operator {
		Operator::Add => l.checked_add(r),
		Operator::Subtract => l.checked_sub(r),
		Operator::Multiply => l.checked_mul(r),
		Operator::Divide => {
			if r == 0 {
				return_error!(engine::divide_by_zero());
			}
			if l % r == 0 {
				l.checked_div(r)
			} else {
				None
			}
		}
		Operator::Modulo => {
			if r == 0 {
				return_error!(engine::divide_by_zero());
			}
			Some(l.checked_rem(r).unwrap_or(0))
		}
		_ => None,
	};
	match result {
		Some(result) => Ok(Value::int8(result)),
		None => float(operator, l as f64, r as f64),
	}
}

fn float(operator: Operator, l: f64, r: f64) -> crate::Result<Value> {
	let result = match operator {
		Operator::Add => l + r,
		Operator::Subtract => l - r,
		Operator::Multiply => l * r,
		Operator::Divide | Operator::Modulo if r == 0.0 => return_error!(engine::divide_by_zero()),
		Operator::Divide => l / r,
		Operator::Modulo => l % r,
		operator => {
			return_error!(engine::type_mismatch(
				operator,
				quarry_type::Type::Float8,
				quarry_type::Type::Float8
			))
		}
	};
	Ok(Value::float8(result))
}

pub(crate) fn negate(value: &Value) -> crate::Result<Value> {
	match value {
		Value::Undefined => Ok(Value::Undefined),
		Value::Int8(v) => Ok(v.checked_neg().map(Value::Int8).unwrap_or_else(|| Value::float8(-(*v as f64)))),
		Value::Float8(v) => Ok(Value::float8(-v.value())),
		other => return_error!(engine::type_mismatch("-", other.get_type(), other.get_type())),
	}
}
