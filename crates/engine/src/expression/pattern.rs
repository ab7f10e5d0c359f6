// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_sql::expression::Operator;
use quarry_type::{GetType, Type, Value, error::diagnostic::engine, return_error};

use crate::context::ExecutionContext;

/// `LIKE`, `NOT LIKE` and `REGEXP`. `LIKE` matches the whole text, `REGEXP`
/// matches anywhere in it.
pub(crate) fn matches(
	ctx: &ExecutionContext<'_>,
	operator: Operator,
	value: &Value,
	pattern: &Value,
) -> crate::Result<Value> {
	let (text, pattern) = match (value, pattern) {
		(Value::Undefined, _) | (_, Value::Undefined) => return Ok(Value::Undefined),
		(Value::Utf8(text), Value::Utf8(pattern)) => (text, pattern),
		(l, r) => return_error!(engine::type_mismatch(operator, l.get_type(), r.get_type())),
	};

	let matched = match operator {
		Operator::Like | Operator::NotLike => {
			let regex = ctx.regex(&like_to_regex(pattern), pattern)?;
			regex.is_match(text) == (operator == Operator::Like)
		}
		Operator::Regexp => ctx.regex(pattern, pattern)?.is_match(text),
		operator => return_error!(engine::type_mismatch(operator, Type::Utf8, Type::Utf8)),
	};
	Ok(Value::Boolean(matched))
}

/// `%` matches any run of characters, `_` exactly one; `\` escapes the next
/// character.
pub(crate) fn like_to_regex(pattern: &str) -> String {
	let mut result = String::with_capacity(pattern.len() + 8);
	result.push_str("(?s)^");
	let mut chars = pattern.chars();
	while let Some(c) = chars.next() {
		match c {
			'%' => result.push_str(".*"),
			'_' => result.push('.'),
			'\\' => match chars.next() {
				Some(escaped) => result.push_str(&regex::escape(&escaped.to_string())),
				None => result.push_str(&regex::escape("\\")),
			},
			c => result.push_str(&regex::escape(&c.to_string())),
		}
	}
	result.push('$');
	result
}
