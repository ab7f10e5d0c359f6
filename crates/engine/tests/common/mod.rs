// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use quarry_core::{SessionConfig, Table};
use quarry_engine::{
	Engine,
	test_utils::{MemoryCatalog, binary, col, init_tracing, lit},
};
use quarry_sql::{
	expression::Operator,
	select::{FromTable, SelectStatement},
};
use quarry_type::{Type, Value};

pub fn engine() -> Engine<MemoryCatalog> {
	Engine::new(catalog(), SessionConfig::default())
}

/// orders(id, customer, total) and customers(id, name), plus the view
/// big_orders over orders with a total above 15.
pub fn catalog() -> MemoryCatalog {
	init_tracing();
	MemoryCatalog::new()
		.with_table(
			"orders",
			&[("id", Type::Int8), ("customer", Type::Utf8), ("total", Type::Int8)],
			vec![
				vec![1.into(), "ann".into(), 10.into()],
				vec![2.into(), "bob".into(), 20.into()],
				vec![3.into(), "ann".into(), 30.into()],
				vec![4.into(), "cid".into(), 5.into()],
			],
		)
		.with_table(
			"customers",
			&[("id", Type::Int8), ("name", Type::Utf8)],
			vec![vec![1.into(), "ann".into()], vec![2.into(), "bob".into()], vec![3.into(), "dan".into()]],
		)
		.with_view(
			"big_orders",
			SelectStatement::new()
				.column(col("id"))
				.column(col("total"))
				.from(FromTable::table("orders"))
				.filter(binary(col("total"), Operator::Gt, lit(15))),
		)
}

pub fn rows(table: &Table) -> Vec<Vec<Value>> {
	table.rows().collect()
}

pub fn column(table: &Table, idx: usize) -> Vec<Value> {
	table.columns[idx].data.clone()
}

pub fn names(table: &Table) -> Vec<String> {
	table.column_names().map(ToString::to_string).collect()
}
