// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{GetType, Type, Value, error::diagnostic::engine, return_error};

use crate::function::{ScalarFunction, ScalarFunctionContext, expect_arity};

pub struct Abs;

impl Abs {
	pub fn new() -> Self {
		Self
	}
}

impl ScalarFunction for Abs {
	fn scalar<'a>(&'a self, ctx: ScalarFunctionContext<'a>) -> crate::Result<Value> {
		expect_arity(ctx.name, 1, ctx.args)?;
		match &ctx.args[0] {
			Value::Undefined => Ok(Value::Undefined),
			Value::Int8(v) => Ok(v.checked_abs().map(Value::Int8).unwrap_or_else(|| Value::float8((*v as f64).abs()))),
			Value::Float8(v) => Ok(Value::float8(v.value().abs())),
			other => return_error!(engine::type_mismatch(ctx.name, other.get_type(), Type::Float8)),
		}
	}
}

/// The first defined argument.
pub struct Coalesce;

impl Coalesce {
	pub fn new() -> Self {
		Self
	}
}

impl ScalarFunction for Coalesce {
	fn scalar<'a>(&'a self, ctx: ScalarFunctionContext<'a>) -> crate::Result<Value> {
		Ok(ctx.args.iter().find(|v| !v.is_undefined()).cloned().unwrap_or(Value::Undefined))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_abs() {
		let abs = Abs::new();
		let call = |v: Value| {
			abs.scalar(ScalarFunctionContext {
				name: "abs",
				args: &[v],
			})
			.unwrap()
		};
		assert_eq!(call(Value::int8(-3)), Value::int8(3));
		assert_eq!(call(Value::float8(-1.5)), Value::float8(1.5));
		assert_eq!(call(Value::Undefined), Value::Undefined);
	}

	#[test]
	fn test_coalesce() {
		let result = Coalesce::new()
			.scalar(ScalarFunctionContext {
				name: "coalesce",
				args: &[Value::Undefined, Value::int8(2), Value::int8(3)],
			})
			.unwrap();
		assert_eq!(result, Value::int8(2));
	}
}
