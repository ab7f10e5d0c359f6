// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, SessionConfig};
use quarry_type::{GetType, Type, error::diagnostic::query, return_error};

use crate::{expression::Expression, plan::FunctionColumn};

/// One column of the SELECT list after glob expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
	pub expression: Expression,
	pub alias: Option<String>,
	/// Name of the column inside the plan: the source column itself, or a
	/// `FUNCTIONTABLE` column computed by a function.
	pub internal: ColumnRef,
	/// Name the column is exposed under.
	pub resolved: ColumnRef,
}

/// The SELECT list split into pass-through variables and functions.
#[derive(Debug, Default)]
pub struct ColumnSet {
	pub columns: Vec<SelectColumn>,
	pub functions: Vec<FunctionColumn>,
	aggregate_count: usize,
}

impl ColumnSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// A source column passed through unchanged.
	pub fn add_variable(&mut self, column: ColumnRef) {
		self.columns.push(SelectColumn {
			expression: Expression::Column(column.clone()),
			alias: None,
			internal: column.clone(),
			resolved: column,
		});
	}

	/// Adds a qualified SELECT item. A bare column whose alias is absent or
	/// equal to the column name stays a variable; anything else becomes a
	/// function column.
	pub fn add(&mut self, expression: Expression, alias: Option<String>, config: &SessionConfig) {
		if let Expression::Column(column) = &expression {
			let same_name = alias.as_ref().is_none_or(|alias| config.identifiers_equal(alias, &column.name));
			if same_name {
				let resolved = match &alias {
					Some(alias) => ColumnRef::new(alias.clone()),
					None => column.clone(),
				};
				self.columns.push(SelectColumn {
					internal: column.clone(),
					expression,
					alias,
					resolved,
				});
				return;
			}
		}

		let aggregate = expression.contains_aggregate();
		if aggregate {
			self.aggregate_count += 1;
		}
		let number = self.functions.len() + 1;
		let internal = if aggregate {
			ColumnRef::function(format!("#FN{}_A", number))
		} else {
			ColumnRef::function(format!("#FN{}", number))
		};
		let resolved = match &alias {
			Some(alias) => ColumnRef::new(alias.clone()),
			None => ColumnRef::new(expression.to_string()),
		};
		self.functions.push(FunctionColumn {
			name: internal.clone(),
			expression: expression.clone(),
		});
		self.columns.push(SelectColumn {
			expression,
			alias,
			internal,
			resolved,
		});
	}

	pub fn has_aggregates(&self) -> bool {
		self.aggregate_count > 0
	}

	pub fn internal_names(&self) -> Vec<ColumnRef> {
		self.columns.iter().map(|c| c.internal.clone()).collect()
	}

	pub fn resolved_names(&self) -> Vec<ColumnRef> {
		self.columns.iter().map(|c| c.resolved.clone()).collect()
	}

	/// The SELECT column whose alias an unqualified reference names.
	pub fn resolve_alias(&self, reference: &ColumnRef, config: &SessionConfig) -> crate::Result<Option<&SelectColumn>> {
		if reference.is_qualified() {
			return Ok(None);
		}
		let mut found = None;
		for column in &self.columns {
			let matches = column.alias.as_ref().is_some_and(|alias| config.identifiers_equal(alias, &reference.name));
			if !matches {
				continue;
			}
			if found.is_some() {
				return_error!(query::ambiguous_column(reference));
			}
			found = Some(column);
		}
		Ok(found)
	}

	/// The type of every SELECT column: a source column's declared type, a
	/// constant's type, `Undefined` for anything computed.
	pub fn output_types(&self, sources: &[(ColumnRef, Type)]) -> Vec<Type> {
		self.columns
			.iter()
			.map(|column| match &column.expression {
				Expression::Column(reference) => sources
					.iter()
					.find(|(source, _)| source == reference)
					.map_or(Type::Undefined, |(_, r#type)| *r#type),
				Expression::Constant(value) => value.get_type(),
				_ => Type::Undefined,
			})
			.collect()
	}

	/// The expression computing a function column.
	pub fn function_expression(&self, name: &ColumnRef) -> Option<&Expression> {
		self.functions.iter().find(|f| &f.name == name).map(|f| &f.expression)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expression::Operator;

	#[test]
	fn test_classification() {
		let config = SessionConfig::default();
		let mut set = ColumnSet::new();
		set.add(Expression::column("t.a"), None, &config);
		set.add(Expression::column("t.b"), Some("b".to_string()), &config);
		set.add(Expression::column("t.c"), Some("renamed".to_string()), &config);
		set.add(
			Expression::binary(Expression::column("t.a"), Operator::Add, Expression::constant(1)),
			None,
			&config,
		);
		set.add(Expression::count_star(), Some("n".to_string()), &config);

		let internal: Vec<String> = set.internal_names().iter().map(ToString::to_string).collect();
		assert_eq!(
			internal,
			vec!["t.a", "t.b", "FUNCTIONTABLE.#FN1", "FUNCTIONTABLE.#FN2", "FUNCTIONTABLE.#FN3_A"]
		);
		let resolved: Vec<String> = set.resolved_names().iter().map(ToString::to_string).collect();
		assert_eq!(resolved, vec!["t.a", "b", "renamed", "(t.a + 1)", "n"]);
		assert_eq!(set.functions.len(), 3);
		assert!(set.has_aggregates());
	}

	#[test]
	fn test_resolve_alias() {
		let config = SessionConfig::default();
		let mut set = ColumnSet::new();
		set.add(Expression::count_star(), Some("n".to_string()), &config);

		let found = set.resolve_alias(&ColumnRef::from("n"), &config).unwrap().unwrap();
		assert_eq!(found.internal, ColumnRef::function("#FN1_A"));
		assert!(set.resolve_alias(&ColumnRef::from("t.n"), &config).unwrap().is_none());

		set.add(Expression::column("t.x"), Some("n".to_string()), &config);
		let err = set.resolve_alias(&ColumnRef::from("n"), &config).unwrap_err();
		assert_eq!(err.code, "QUERY_002");
	}
	#[test]
	fn test_output_types() {
		let config = SessionConfig::default();
		let mut set = ColumnSet::new();
		set.add(Expression::column("t.a"), None, &config);
		set.add(Expression::column("t.b"), Some("renamed".to_string()), &config);
		set.add(Expression::constant("x"), None, &config);
		set.add(Expression::count_star(), None, &config);
		set.add(Expression::column("t.unknown"), None, &config);

		let sources = [(ColumnRef::from("t.a"), Type::Int8), (ColumnRef::from("t.b"), Type::Utf8)];
		assert_eq!(
			set.output_types(&sources),
			vec![Type::Int8, Type::Utf8, Type::Utf8, Type::Undefined, Type::Undefined]
		);
	}
}
