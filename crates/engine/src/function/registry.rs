// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use crate::function::{AggregateFunction, ScalarFunction, aggregate, math, text};

/// Scalar and aggregate functions by lower case name. Aggregates are created
/// fresh for every group.
pub struct Functions {
	scalars: HashMap<String, Box<dyn Fn() -> Box<dyn ScalarFunction>>>,
	aggregates: HashMap<String, Box<dyn Fn() -> Box<dyn AggregateFunction>>>,
}

impl Functions {
	pub fn empty() -> Self {
		Self {
			scalars: HashMap::new(),
			aggregates: HashMap::new(),
		}
	}

	/// The built in function set.
	pub fn new() -> Self {
		let mut result = Self::empty();
		result.register_scalar("lower", text::Lower::new);
		result.register_scalar("upper", text::Upper::new);
		result.register_scalar("length", text::Length::new);
		result.register_scalar("abs", math::Abs::new);
		result.register_scalar("coalesce", math::Coalesce::new);

		result.register_aggregate("count", aggregate::Count::new);
		result.register_aggregate("sum", aggregate::Sum::new);
		result.register_aggregate("avg", aggregate::Avg::new);
		result.register_aggregate("min", aggregate::Min::new);
		result.register_aggregate("max", aggregate::Max::new);
		result
	}

	pub fn get_aggregate(&self, name: &str) -> Option<Box<dyn AggregateFunction>> {
		self.aggregates.get(&name.to_lowercase()).map(|func| func())
	}

	pub fn is_aggregate(&self, name: &str) -> bool {
		self.aggregates.contains_key(&name.to_lowercase())
	}

	pub fn register_aggregate<F, A>(&mut self, name: &str, init: F)
	where
		F: Fn() -> A + 'static,
		A: AggregateFunction + 'static,
	{
		self.aggregates
			.insert(name.to_lowercase(), Box::new(move || Box::new(init()) as Box<dyn AggregateFunction>));
	}

	pub fn get_scalar(&self, name: &str) -> Option<Box<dyn ScalarFunction>> {
		self.scalars.get(&name.to_lowercase()).map(|func| func())
	}

	pub fn register_scalar<F, A>(&mut self, name: &str, init: F)
	where
		F: Fn() -> A + 'static,
		A: ScalarFunction + 'static,
	{
		self.scalars.insert(name.to_lowercase(), Box::new(move || Box::new(init()) as Box<dyn ScalarFunction>));
	}
}

impl Default for Functions {
	fn default() -> Self {
		Self::new()
	}
}
