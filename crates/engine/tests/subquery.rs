// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod common;

use common::{column, engine};
use quarry_engine::test_utils::{binary, col, eq, lit};
use quarry_sql::{
	expression::{Expression, Operator, Quantifier},
	select::{FromTable, SelectStatement},
};
use quarry_type::Value;

fn average_total_of_same_customer() -> SelectStatement {
	SelectStatement::new()
		.column(Expression::call("avg", vec![col("i.total")]))
		.from(FromTable::aliased("orders", "i"))
		.filter(eq(col("i.customer"), col("o.customer")))
}

#[test]
fn test_correlated_scalar_subquery() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new().column(col("o.id")).from(FromTable::aliased("orders", "o")).filter(binary(
				col("o.total"),
				Operator::Gt,
				Expression::subquery(average_total_of_same_customer()),
			)),
		)
		.unwrap();
	// ann averages 20, bob and cid have a single order each
	assert_eq!(column(&result, 0), vec![Value::int8(3)]);
}

#[test]
fn test_non_correlated_scalar_subquery() {
	let engine = engine();
	let result = engine
		.query(
			&SelectStatement::new().column(col("id")).from(FromTable::table("orders")).filter(eq(
				col("total"),
				Expression::subquery(
					SelectStatement::new()
						.column(Expression::call("max", vec![col("total")]))
						.from(FromTable::table("orders")),
				),
			)),
		)
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::int8(3)]);
}

#[test]
fn test_scalar_subquery_with_several_rows() {
	let engine = engine();
	let err = engine
		.query(&SelectStatement::new().column(col("id")).from(FromTable::table("orders")).filter(eq(
			col("total"),
			Expression::subquery(SelectStatement::new().column(col("total")).from(FromTable::table("orders"))),
		)))
		.unwrap_err();
	assert_eq!(err.code, "ENGINE_006");
}

#[test]
fn test_any_over_subquery() {
	let engine = engine();
	let result = engine
		.query(&SelectStatement::new().column(col("id")).from(FromTable::table("orders")).filter(
			Expression::quantified(
				col("customer"),
				Operator::Equal,
				Quantifier::Any,
				Expression::subquery(SelectStatement::new().column(col("name")).from(FromTable::table("customers"))),
			),
		))
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::int8(1), Value::int8(2), Value::int8(3)]);
}

#[test]
fn test_all_over_subquery() {
	let engine = engine();
	let result = engine
		.query(&SelectStatement::new().column(col("id")).from(FromTable::table("orders")).filter(
			Expression::quantified(
				col("total"),
				Operator::GtEq,
				Quantifier::All,
				Expression::subquery(SelectStatement::new().column(col("total")).from(FromTable::table("orders"))),
			),
		))
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::int8(3)]);
}

#[test]
fn test_all_over_empty_subquery() {
	let engine = engine();
	let empty = SelectStatement::new()
		.column(col("id"))
		.from(FromTable::table("customers"))
		.filter(binary(col("id"), Operator::Gt, lit(100)));
	let result = engine
		.query(&SelectStatement::new().column(col("id")).from(FromTable::table("orders")).filter(
			Expression::quantified(col("id"), Operator::Equal, Quantifier::All, Expression::subquery(empty)),
		))
		.unwrap();
	assert_eq!(result.row_count(), 4);
}

#[test]
fn test_in_list() {
	let engine = engine();
	let result = engine
		.query(&SelectStatement::new().column(col("name")).from(FromTable::table("customers")).filter(
			Expression::quantified(
				col("id"),
				Operator::Equal,
				Quantifier::Any,
				Expression::Tuple(vec![lit(1), lit(3)]),
			),
		))
		.unwrap();
	assert_eq!(column(&result, 0), vec![Value::utf8("ann"), Value::utf8("dan")]);
}

#[test]
fn test_subquery_in_select_list() {
	let engine = engine();
	let err = engine
		.query(
			&SelectStatement::new()
				.column(Expression::subquery(average_total_of_same_customer()))
				.from(FromTable::aliased("orders", "o")),
		)
		.unwrap_err();
	assert_eq!(err.code, "PLAN_005");
}
