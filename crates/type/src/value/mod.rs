// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

mod ordered_f64;
mod r#type;

pub use ordered_f64::{OrderedF64, OrderedFloatError};
pub use r#type::{GetType, Type};

/// A SQL value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// An 8-byte signed integer, the exact-scale numeric
	Int8(i64),
	/// An 8-byte floating point
	Float8(OrderedF64),
	/// A UTF-8 encoded text
	Utf8(String),
}

impl Value {
	pub fn undefined() -> Self {
		Value::Undefined
	}

	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn float8(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Float8).unwrap_or(Value::Undefined)
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	pub fn is_number(&self) -> bool {
		matches!(self, Value::Int8(_) | Value::Float8(_))
	}

	/// Three valued truth: `None` when the value is undefined or not a boolean.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int8(v) => Some(*v as f64),
			Value::Float8(v) => Some(v.value()),
			_ => None,
		}
	}

	/// SQL comparison. Integers and floats are compared after promotion; values of
	/// unrelated types, and anything compared with `Undefined`, have no ordering.
	pub fn compare(&self, other: &Value) -> Option<Ordering> {
		match (self, other) {
			(Value::Undefined, _) | (_, Value::Undefined) => None,
			(Value::Boolean(l), Value::Boolean(r)) => Some(l.cmp(r)),
			(Value::Int8(l), Value::Int8(r)) => Some(l.cmp(r)),
			(Value::Utf8(l), Value::Utf8(r)) => Some(l.cmp(r)),
			(l, r) if l.is_number() && r.is_number() => {
				let l = l.as_f64()?;
				let r = r.as_f64()?;
				l.partial_cmp(&r)
			}
			_ => None,
		}
	}

	/// Total order used by sorting: undefined first, then values by `compare`,
	/// unrelated types by their type rank.
	pub fn sort_cmp(&self, other: &Value) -> Ordering {
		match (self, other) {
			(Value::Undefined, Value::Undefined) => Ordering::Equal,
			(Value::Undefined, _) => Ordering::Less,
			(_, Value::Undefined) => Ordering::Greater,
			(l, r) => match l.compare(r) {
				Some(ordering) => ordering,
				None => l.get_type().rank().cmp(&r.get_type().rank()),
			},
		}
	}

	/// Exact-scale integer check used for positional ORDER BY references.
	pub fn as_exact_integer(&self) -> Option<i64> {
		match self {
			Value::Int8(v) => Some(*v),
			_ => None,
		}
	}
}

impl GetType for Value {
	fn get_type(&self) -> Type {
		match self {
			Value::Undefined => Type::Undefined,
			Value::Boolean(_) => Type::Boolean,
			Value::Int8(_) => Type::Int8,
			Value::Float8(_) => Type::Float8,
			Value::Utf8(_) => Type::Utf8,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Undefined => f.write_str("Undefined"),
			Value::Boolean(true) => f.write_str("true"),
			Value::Boolean(false) => f.write_str("false"),
			Value::Int8(value) => Display::fmt(value, f),
			Value::Float8(value) => Display::fmt(value, f),
			Value::Utf8(value) => Display::fmt(value, f),
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int8(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int8(v as i64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::float8(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Utf8(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Utf8(v)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map(Into::into).unwrap_or(Value::Undefined)
	}
}
