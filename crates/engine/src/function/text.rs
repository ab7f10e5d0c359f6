// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_type::{GetType, Type, Value, error::diagnostic::engine, return_error};

use crate::function::{ScalarFunction, ScalarFunctionContext, expect_arity};

fn map_text(ctx: &ScalarFunctionContext<'_>, f: impl Fn(&str) -> Value) -> crate::Result<Value> {
	expect_arity(ctx.name, 1, ctx.args)?;
	match &ctx.args[0] {
		Value::Undefined => Ok(Value::Undefined),
		Value::Utf8(text) => Ok(f(text)),
		other => return_error!(engine::type_mismatch(ctx.name, other.get_type(), Type::Utf8)),
	}
}

pub struct Lower;

impl Lower {
	pub fn new() -> Self {
		Self
	}
}

impl ScalarFunction for Lower {
	fn scalar<'a>(&'a self, ctx: ScalarFunctionContext<'a>) -> crate::Result<Value> {
		map_text(&ctx, |text| Value::utf8(text.to_lowercase()))
	}
}

pub struct Upper;

impl Upper {
	pub fn new() -> Self {
		Self
	}
}

impl ScalarFunction for Upper {
	fn scalar<'a>(&'a self, ctx: ScalarFunctionContext<'a>) -> crate::Result<Value> {
		map_text(&ctx, |text| Value::utf8(text.to_uppercase()))
	}
}

/// Length in characters.
pub struct Length;

impl Length {
	pub fn new() -> Self {
		Self
	}
}

impl ScalarFunction for Length {
	fn scalar<'a>(&'a self, ctx: ScalarFunctionContext<'a>) -> crate::Result<Value> {
		map_text(&ctx, |text| Value::int8(text.chars().count() as i64))
	}
}
