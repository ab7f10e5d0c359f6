// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Aggregates skip undefined inputs. Over no defined input `count` yields 0
//! and every other aggregate yields undefined.

use std::cmp::Ordering;

use quarry_type::{GetType, Type, Value, error::diagnostic::engine, return_error};

use crate::function::{AggregateFunction, AggregateFunctionContext, expect_arity};

/// `count(*)` counts rows; `count(x)` counts defined values of `x`.
pub struct Count {
	count: i64,
}

impl Count {
	pub fn new() -> Self {
		Self {
			count: 0,
		}
	}
}

impl AggregateFunction for Count {
	fn aggregate<'a>(&'a mut self, ctx: AggregateFunctionContext<'a>) -> crate::Result<()> {
		if ctx.args.iter().all(|v| !v.is_undefined()) {
			self.count += 1;
		}
		Ok(())
	}

	fn finalize(&mut self) -> crate::Result<Value> {
		Ok(Value::int8(self.count))
	}
}

enum Total {
	None,
	Int(i64),
	Float(f64),
}

impl Total {
	fn add(&mut self, name: &str, value: &Value) -> crate::Result<()> {
		*self = match (&*self, value) {
			(_, Value::Undefined) => return Ok(()),
			(Total::None, Value::Int8(v)) => Total::Int(*v),
			(Total::Int(sum), Value::Int8(v)) => match sum.checked_add(*v) {
				Some(sum) => Total::Int(sum),
				None => Total::Float(*sum as f64 + *v as f64),
			},
			(Total::None, Value::Float8(v)) => Total::Float(v.value()),
			(Total::Int(sum), Value::Float8(v)) => Total::Float(*sum as f64 + v.value()),
			(Total::Float(sum), value) if value.is_number() => Total::Float(sum + value.as_f64().unwrap_or_default()),
			(_, other) => return_error!(engine::type_mismatch(name, other.get_type(), Type::Float8)),
		};
		Ok(())
	}

	fn value(&self) -> Value {
		match self {
			Total::None => Value::Undefined,
			Total::Int(sum) => Value::int8(*sum),
			Total::Float(sum) => Value::float8(*sum),
		}
	}
}

pub struct Sum {
	total: Total,
}

impl Sum {
	pub fn new() -> Self {
		Self {
			total: Total::None,
		}
	}
}

impl AggregateFunction for Sum {
	fn aggregate<'a>(&'a mut self, ctx: AggregateFunctionContext<'a>) -> crate::Result<()> {
		expect_arity(ctx.name, 1, ctx.args)?;
		self.total.add(ctx.name, &ctx.args[0])
	}

	fn finalize(&mut self) -> crate::Result<Value> {
		Ok(self.total.value())
	}
}

pub struct Avg {
	sum: f64,
	count: u64,
}

impl Avg {
	pub fn new() -> Self {
		Self {
			sum: 0.0,
			count: 0,
		}
	}
}

impl AggregateFunction for Avg {
	fn aggregate<'a>(&'a mut self, ctx: AggregateFunctionContext<'a>) -> crate::Result<()> {
		expect_arity(ctx.name, 1, ctx.args)?;
		match &ctx.args[0] {
			Value::Undefined => {}
			value if value.is_number() => {
				self.sum += value.as_f64().unwrap_or_default();
				self.count += 1;
			}
			other => return_error!(engine::type_mismatch(ctx.name, other.get_type(), Type::Float8)),
		}
		Ok(())
	}

	fn finalize(&mut self) -> crate::Result<Value> {
		if self.count == 0 {
			return Ok(Value::Undefined);
		}
		Ok(Value::float8(self.sum / self.count as f64))
	}
}

/// Keeps the defined value that wins against every other under `keep`.
struct Extreme {
	current: Option<Value>,
	keep: Ordering,
}

impl Extreme {
	fn offer(&mut self, name: &str, value: &Value) -> crate::Result<()> {
		if value.is_undefined() {
			return Ok(());
		}
		let replace = match &self.current {
			None => true,
			Some(current) => match value.compare(current) {
				Some(ordering) => ordering == self.keep,
				None => return_error!(engine::type_mismatch(name, current.get_type(), value.get_type())),
			},
		};
		if replace {
			self.current = Some(value.clone());
		}
		Ok(())
	}
}

pub struct Min(Extreme);

impl Min {
	pub fn new() -> Self {
		Self(Extreme {
			current: None,
			keep: Ordering::Less,
		})
	}
}

impl AggregateFunction for Min {
	fn aggregate<'a>(&'a mut self, ctx: AggregateFunctionContext<'a>) -> crate::Result<()> {
		expect_arity(ctx.name, 1, ctx.args)?;
		self.0.offer(ctx.name, &ctx.args[0])
	}

	fn finalize(&mut self) -> crate::Result<Value> {
		Ok(self.0.current.take().unwrap_or(Value::Undefined))
	}
}

pub struct Max(Extreme);

impl Max {
	pub fn new() -> Self {
		Self(Extreme {
			current: None,
			keep: Ordering::Greater,
		})
	}
}

impl AggregateFunction for Max {
	fn aggregate<'a>(&'a mut self, ctx: AggregateFunctionContext<'a>) -> crate::Result<()> {
		expect_arity(ctx.name, 1, ctx.args)?;
		self.0.offer(ctx.name, &ctx.args[0])
	}

	fn finalize(&mut self) -> crate::Result<Value> {
		Ok(self.0.current.take().unwrap_or(Value::Undefined))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn run(mut function: impl AggregateFunction, values: &[Value]) -> crate::Result<Value> {
		for value in values {
			function.aggregate(AggregateFunctionContext {
				name: "f",
				args: std::slice::from_ref(value),
			})?;
		}
		function.finalize()
	}

	#[test]
	fn test_count_skips_undefined() {
		let values = [Value::int8(1), Value::Undefined, Value::int8(3)];
		assert_eq!(run(Count::new(), &values).unwrap(), Value::int8(2));
	}

	#[test]
	fn test_sum() {
		assert_eq!(run(Sum::new(), &[Value::int8(1), Value::int8(2)]).unwrap(), Value::int8(3));
		assert_eq!(run(Sum::new(), &[Value::int8(1), Value::float8(0.5)]).unwrap(), Value::float8(1.5));
		assert_eq!(run(Sum::new(), &[]).unwrap(), Value::Undefined);
		assert_eq!(run(Sum::new(), &["a".into()]).unwrap_err().code, "ENGINE_001");
	}

	#[test]
	fn test_avg() {
		let values = [Value::int8(1), Value::int8(2), Value::Undefined];
		assert_eq!(run(Avg::new(), &values).unwrap(), Value::float8(1.5));
		assert_eq!(run(Avg::new(), &[Value::Undefined]).unwrap(), Value::Undefined);
	}

	#[test]
	fn test_min_max() {
		let values = [Value::int8(4), Value::Undefined, Value::int8(-2), Value::int8(9)];
		assert_eq!(run(Min::new(), &values).unwrap(), Value::int8(-2));
		assert_eq!(run(Max::new(), &values).unwrap(), Value::int8(9));
		assert_eq!(run(Max::new(), &["a".into(), "c".into(), "b".into()]).unwrap(), Value::utf8("c"));
	}

	#[test]
	fn test_min_rejects_mixed_types() {
		let err = run(Min::new(), &[Value::int8(1), "a".into()]).unwrap_err();
		assert_eq!(err.code, "ENGINE_001");
	}
}
