// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::{catalog, column, engine, names, rows};
use quarry_core::{JoinType, SessionConfig, SortDirection::*, TableName, table::SetOperation};
use quarry_engine::{
	Engine, Functions,
	function::aggregate,
	test_utils::{binary, col, eq, lit},
};
use quarry_sql::{
	expression::{Expression, Operator},
	select::{FromTable, SelectStatement},
};
use quarry_type::Value;

#[test]
fn test_select_constant_without_from() {
	let engine = engine();
	let result = engine.query(&SelectStatement::new().column(binary(lit(1), Operator::Add, lit(1)))).unwrap();
	assert_eq!(result.row_count(), 1);
	assert_eq!(result.column_count(), 1);
	assert_eq!(result.value(0, 0), &Value::int8(2));
}

#[test]
fn test_aggregate_without_from() {
	let engine = engine();
	let err = engine.query(&SelectStatement::new().column(Expression::count_star())).unwrap_err();
	assert_eq!(err.code, "PLAN_001");
}

#[test]
fn test_filter_and_projection() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("id"))
				.column_as(binary(col("total"), Operator::Multiply, lit(2)), "doubled")
				.from(FromTable::table("orders"))
				.filter(binary(col("total"), Operator::Gt, lit(15))),
		)
		.unwrap();
	assert_eq!(names(&result), vec!["orders.id", "doubled"]);
	assert_eq!(rows(&result), vec![vec![Value::int8(2), Value::int8(40)], vec![Value::int8(3), Value::int8(60)]]);
}

#[test]
fn test_inner_join_on_matches_where_form() {
	let engine = engine();
	let on = SelectStatement::new()
		.column(col("o.id"))
		.column(col("c.id"))
		.from(FromTable::aliased("orders", "o"))
		.join(JoinType::Inner, FromTable::aliased("customers", "c"), Some(eq(col("o.customer"), col("c.name"))));
	let where_form = SelectStatement::new()
		.column(col("o.id"))
		.column(col("c.id"))
		.from(FromTable::aliased("orders", "o"))
		.from(FromTable::aliased("customers", "c"))
		.filter(eq(col("o.customer"), col("c.name")));

	assert_eq!(engine.explain(&on).unwrap(), engine.explain(&where_form).unwrap());

	let joined = engine.query(&on).unwrap();
	assert_eq!(joined, engine.query(&where_form).unwrap());
	assert_eq!(joined.row_count(), 3);
	for row in rows(&joined) {
		let expected = match row[0] {
			Value::Int8(1) | Value::Int8(3) => Value::int8(1),
			_ => Value::int8(2),
		};
		assert_eq!(row[1], expected);
	}
}

#[test]
fn test_left_outer_join_pads_unmatched() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("c.name"))
				.column(col("o.id"))
				.from(FromTable::aliased("customers", "c"))
				.join(JoinType::LeftOuter, FromTable::aliased("orders", "o"), Some(eq(col("o.customer"), col("c.name")))),
		)
		.unwrap();
	let rows = rows(&result);
	assert_eq!(rows.len(), 4);
	assert!(rows.contains(&vec![Value::utf8("dan"), Value::Undefined]));
	assert!(!rows.iter().any(|row| row[0] == Value::utf8("cid")));
}

#[test]
fn test_order_by_position() {
	let engine = engine();
	let select = || SelectStatement::new().column(col("id")).column(col("total")).from(FromTable::table("orders"));
	let by_position = engine.query(&select().order_by(lit(2), Desc)).unwrap();
	let by_name = engine.query(&select().order_by(col("total"), Desc)).unwrap();
	assert_eq!(by_position, by_name);
	assert_eq!(column(&by_position, 0), vec![Value::int8(3), Value::int8(2), Value::int8(1), Value::int8(4)]);
}

#[test]
fn test_mixed_sort_directions() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("customer"))
				.column(col("total"))
				.from(FromTable::table("orders"))
				.order_by(col("customer"), Desc)
				.order_by(col("total"), Asc),
		)
		.unwrap();

	let mut expected = rows(&result);
	expected.sort_by(|l, r| r[0].sort_cmp(&l[0]).then(l[1].sort_cmp(&r[1])));
	assert_eq!(rows(&result), expected);
	assert_eq!(column(&result, 1), vec![Value::int8(5), Value::int8(20), Value::int8(10), Value::int8(30)]);
}

#[test]
fn test_order_by_expression() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("id"))
				.from(FromTable::table("orders"))
				.order_by(binary(col("id"), Operator::Modulo, lit(2)), Asc)
				.order_by(col("id"), Desc),
		)
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::int8(4), Value::int8(2), Value::int8(3), Value::int8(1)]);
	assert_eq!(result.column_count(), 1);
}

#[test]
fn test_group_by_having() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("customer"))
				.column_as(Expression::call("sum", vec![col("total")]), "spent")
				.from(FromTable::table("orders"))
				.group_by(col("customer"))
				.having(binary(Expression::count_star(), Operator::Gt, lit(1))),
		)
		.unwrap();
	assert_eq!(names(&result), vec!["orders.customer", "spent"]);
	assert_eq!(rows(&result), vec![vec![Value::utf8("ann"), Value::int8(40)]]);
}

#[test]
fn test_group_by_ordered_by_aggregate() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("customer"))
				.column(Expression::count_star())
				.from(FromTable::table("orders"))
				.group_by(col("customer"))
				.order_by(Expression::call("max", vec![col("total")]), Desc),
		)
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::utf8("ann"), Value::utf8("bob"), Value::utf8("cid")]);
	assert_eq!(column(&result, 1), vec![Value::int8(2), Value::int8(1), Value::int8(1)]);
}

#[test]
fn test_aggregates_over_empty_input() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(Expression::count_star())
				.column(Expression::call("max", vec![col("total")]))
				.from(FromTable::table("orders"))
				.filter(binary(col("total"), Operator::Gt, lit(100))),
		)
		.unwrap();
	assert_eq!(rows(&result), vec![vec![Value::int8(0), Value::Undefined]]);
}

#[test]
fn test_registered_aggregate() {
	let mut functions = Functions::new();
	functions.register_aggregate("total_of", aggregate::Sum::new);
	let engine = Engine::with_functions(catalog(), SessionConfig::default(), functions);

	let grouped = engine
		.query(
			&SelectStatement::new()
				.column(col("customer"))
				.column(Expression::call("total_of", vec![col("total")]))
				.from(FromTable::table("orders"))
				.group_by(col("customer")),
		)
		.unwrap();
	assert_eq!(
		rows(&grouped),
		vec![
			vec![Value::utf8("ann"), Value::int8(40)],
			vec![Value::utf8("bob"), Value::int8(20)],
			vec![Value::utf8("cid"), Value::int8(5)],
		]
	);

	let whole = engine
		.query(
			&SelectStatement::new()
				.column(Expression::call("total_of", vec![col("total")]))
				.from(FromTable::table("orders")),
		)
		.unwrap();
	assert_eq!(rows(&whole), vec![vec![Value::int8(65)]]);
}

#[test]
fn test_group_max_representative() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("customer"))
				.column(col("id"))
				.from(FromTable::table("orders"))
				.group_by(col("customer"))
				.group_max("total"),
		)
		.unwrap();
	assert_eq!(
		rows(&result),
		vec![
			vec![Value::utf8("ann"), Value::int8(3)],
			vec![Value::utf8("bob"), Value::int8(2)],
			vec![Value::utf8("cid"), Value::int8(4)],
		]
	);
}

#[test]
fn test_distinct() {
	let engine = engine();
	let result = engine
		.query(&SelectStatement::new().distinct().column(col("customer")).from(FromTable::table("orders")))
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::utf8("ann"), Value::utf8("bob"), Value::utf8("cid")]);
}

#[test]
fn test_union_and_union_all() {
	let engine = engine();
	let statement = |all| {
		SelectStatement::new().column(col("customer")).from(FromTable::table("orders")).composite(
			SetOperation::Union,
			all,
			SelectStatement::new().column(col("name")).from(FromTable::table("customers")),
		)
	};

	let distinct = engine.query(&statement(false)).unwrap();
	assert_eq!(
		column(&distinct, 0),
		vec![Value::utf8("ann"), Value::utf8("bob"), Value::utf8("cid"), Value::utf8("dan")]
	);
	assert_eq!(engine.query(&statement(true)).unwrap().row_count(), 7);
}

#[test]
fn test_union_of_incompatible_columns() {
	let engine = engine();
	let statement = SelectStatement::new().column(col("id")).from(FromTable::table("orders")).composite(
		SetOperation::Union,
		false,
		SelectStatement::new().column(col("name")).from(FromTable::table("customers")),
	);
	assert_eq!(engine.plan(&statement).unwrap_err().code, "PLAN_003");
}

#[test]
fn test_order_by_position_out_of_range() {
	let engine = engine();
	let err = engine
		.query(
			&SelectStatement::new()
				.column(col("id"))
				.column(col("total"))
				.from(FromTable::table("orders"))
				.order_by(lit(5), Asc),
		)
		.unwrap_err();
	assert_eq!(err.code, "QUERY_003");
}

#[test]
fn test_except_ordered() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("name"))
				.from(FromTable::table("customers"))
				.composite(
					SetOperation::Except,
					false,
					SelectStatement::new().column(col("customer")).from(FromTable::table("orders")),
				)
				.order_by(col("name"), Asc),
		)
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::utf8("dan")]);
}

#[test]
fn test_pattern_select() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new()
				.column(col("name"))
				.from(FromTable::table("customers"))
				.filter(binary(col("name"), Operator::Like, lit("%n"))),
		)
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::utf8("ann"), Value::utf8("dan")]);
}

#[test]
fn test_view_and_derived_table() {
	let engine = engine();
	let view = engine.query(&SelectStatement::new().glob().from(FromTable::table("big_orders"))).unwrap();
	assert_eq!(names(&view), vec!["big_orders.id", "big_orders.total"]);
	assert_eq!(column(&view, 0), vec![Value::int8(2), Value::int8(3)]);

	let derived = engine
		.query(
			&SelectStatement::new()
				.column(col("s.name"))
				.from(FromTable::subquery(
					SelectStatement::new().column(col("name")).from(FromTable::table("customers")),
					"s",
				))
				.filter(eq(col("s.name"), lit("bob"))),
		)
		.unwrap();
	assert_eq!(rows(&derived), vec![vec![Value::utf8("bob")]]);
}

#[test]
fn test_clone_evaluates_independently() {
	let engine = engine();
	let plan = engine
		.plan(&SelectStatement::new().column(col("id")).from(FromTable::table("orders")).order_by(col("id"), Desc))
		.unwrap();

	let copy = plan.clone();
	assert_eq!(engine.execute(&copy).unwrap(), engine.execute(&plan).unwrap());

	let renamed = copy.with_given_name(TableName::new("renamed"), &[]);
	let renamed = engine.execute(&renamed).unwrap();
	assert_eq!(names(&renamed), vec!["renamed.id"]);
	assert_eq!(names(&engine.execute(&plan).unwrap()), vec!["orders.id"]);
}

#[test]
fn test_lock_set_and_explain() {
	let engine = engine();
	let statement = SelectStatement::new().column(col("id")).from(FromTable::table("big_orders")).filter(
		Expression::quantified(
			col("id"),
			Operator::Equal,
			quarry_sql::expression::Quantifier::Any,
			Expression::subquery(SelectStatement::new().column(col("id")).from(FromTable::table("customers"))),
		),
	);
	assert_eq!(engine.lock_set(&statement).unwrap(), vec![TableName::new("orders"), TableName::new("customers")]);
	let explained = engine.explain(&statement).unwrap();
	assert!(explained.contains("big_orders"), "{}", explained);
}

#[test]
fn test_evaluation_errors() {
	let engine = engine();
	let divide = SelectStatement::new()
		.column(binary(col("total"), Operator::Divide, lit(0)))
		.from(FromTable::table("orders"));
	assert_eq!(engine.query(&divide).unwrap_err().code, "ENGINE_002");

	let mismatch = SelectStatement::new()
		.column(col("id"))
		.from(FromTable::table("orders"))
		.filter(binary(col("customer"), Operator::Gt, lit(1)));
	assert_eq!(engine.query(&mismatch).unwrap_err().code, "ENGINE_001");

	let unknown = SelectStatement::new().column(Expression::call("nope", vec![col("id")])).from(FromTable::table("orders"));
	assert_eq!(engine.query(&unknown).unwrap_err().code, "ENGINE_004");
}

#[test]
fn test_resolution_errors() {
	let engine = engine();
	let missing = SelectStatement::new().column(col("id")).from(FromTable::table("nope"));
	assert_eq!(engine.query(&missing).unwrap_err().code, "CATALOG_001");

	let column = SelectStatement::new().column(col("nope")).from(FromTable::table("orders"));
	assert_eq!(engine.query(&column).unwrap_err().code, "QUERY_001");
}
