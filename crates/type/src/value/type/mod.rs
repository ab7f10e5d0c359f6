// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// All possible column types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
	/// Value is not defined (think null in common programming languages)
	Undefined,
	/// A boolean: true or false.
	Boolean,
	/// An 8-byte signed integer
	Int8,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text
	Utf8,
}

impl Type {
	pub fn is_number(&self) -> bool {
		matches!(self, Type::Int8 | Type::Float8)
	}

	/// Set operations accept branches whose column types line up: equal, either
	/// side undefined, or both numeric.
	pub fn is_compatible(&self, other: &Type) -> bool {
		self == other
			|| *self == Type::Undefined
			|| *other == Type::Undefined
			|| (self.is_number() && other.is_number())
	}

	pub(crate) fn rank(&self) -> u8 {
		match self {
			Type::Undefined => 0,
			Type::Boolean => 1,
			Type::Int8 | Type::Float8 => 2,
			Type::Utf8 => 3,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Undefined => f.write_str("UNDEFINED"),
			Type::Boolean => f.write_str("BOOL"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("UTF8"),
		}
	}
}

pub trait GetType {
	fn get_type(&self) -> Type;
}
