// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
	Add,
	Subtract,
	Multiply,
	Divide,
	Modulo,
	Concat,

	Equal,
	NotEqual,
	Lt,
	LtEq,
	Gt,
	GtEq,
	/// Equality under which two undefined values match.
	Is,
	IsNot,

	Like,
	NotLike,
	Regexp,

	And,
	Or,
}

impl Operator {
	pub fn is_comparison(&self) -> bool {
		matches!(
			self,
			Operator::Equal
				| Operator::NotEqual | Operator::Lt
				| Operator::LtEq | Operator::Gt
				| Operator::GtEq | Operator::Is
				| Operator::IsNot
		)
	}

	pub fn is_pattern(&self) -> bool {
		matches!(self, Operator::Like | Operator::NotLike | Operator::Regexp)
	}

	pub fn is_logical(&self) -> bool {
		matches!(self, Operator::And | Operator::Or)
	}

	/// The operator that gives the same answer with its operands swapped.
	pub fn reverse(&self) -> Operator {
		match self {
			Operator::Lt => Operator::Gt,
			Operator::LtEq => Operator::GtEq,
			Operator::Gt => Operator::Lt,
			Operator::GtEq => Operator::LtEq,
			other => *other,
		}
	}
}

impl Display for Operator {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			Operator::Add => "+",
			Operator::Subtract => "-",
			Operator::Multiply => "*",
			Operator::Divide => "/",
			Operator::Modulo => "%",
			Operator::Concat => "||",
			Operator::Equal => "=",
			Operator::NotEqual => "<>",
			Operator::Lt => "<",
			Operator::LtEq => "<=",
			Operator::Gt => ">",
			Operator::GtEq => ">=",
			Operator::Is => "IS",
			Operator::IsNot => "IS NOT",
			Operator::Like => "LIKE",
			Operator::NotLike => "NOT LIKE",
			Operator::Regexp => "REGEXP",
			Operator::And => "AND",
			Operator::Or => "OR",
		};
		f.write_str(symbol)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
	Any,
	All,
}

impl Display for Quantifier {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Quantifier::Any => f.write_str("ANY"),
			Quantifier::All => f.write_str("ALL"),
		}
	}
}
