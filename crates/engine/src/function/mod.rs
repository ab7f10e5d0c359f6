// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::Value;

pub use registry::Functions;

pub mod aggregate;
pub mod math;
mod registry;
pub mod text;

pub struct ScalarFunctionContext<'a> {
	pub name: &'a str,
	pub args: &'a [Value],
}

pub trait ScalarFunction: Send + Sync {
	fn scalar<'a>(&'a self, ctx: ScalarFunctionContext<'a>) -> crate::Result<Value>;
}

/// The arguments of one row of the group being aggregated.
pub struct AggregateFunctionContext<'a> {
	pub name: &'a str,
	pub args: &'a [Value],
}

pub trait AggregateFunction: Send + Sync {
	fn aggregate<'a>(&'a mut self, ctx: AggregateFunctionContext<'a>) -> crate::Result<()>;

	fn finalize(&mut self) -> crate::Result<Value>;
}

pub(crate) fn expect_arity(name: &str, expected: usize, args: &[Value]) -> crate::Result<()> {
	if args.len() != expected {
		quarry_type::return_error!(quarry_type::error::diagnostic::engine::function_arity(
			name,
			expected,
			args.len()
		));
	}
	Ok(())
}
