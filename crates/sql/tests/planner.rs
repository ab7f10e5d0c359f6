// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{ColumnRef, JoinType, SessionConfig, SortDirection, TableName, table::SetOperation};
use quarry_sql::{
	catalog::{Catalog, ColumnDef, TableDef, ViewDef},
	expression::{Expression, Operator, Quantifier},
	plan::{BranchOp, FetchNode, PlanNode, Planner, SingleNode, SingleOp, compile_select},
	select::{FromTable, SelectStatement},
};
use quarry_type::Type;

struct TestCatalog {
	tables: Vec<TableDef>,
	views: Vec<ViewDef>,
}

impl Catalog for TestCatalog {
	fn find_table(&self, name: &TableName) -> Option<TableDef> {
		self.tables.iter().find(|t| t.name == *name).cloned()
	}

	fn find_view(&self, name: &TableName) -> Option<ViewDef> {
		self.views.iter().find(|v| v.name == *name).cloned()
	}
}

fn table(name: &str, columns: &[(&str, Type)]) -> TableDef {
	TableDef {
		name: TableName::new(name),
		columns: columns
			.iter()
			.map(|(name, r#type)| ColumnDef {
				name: name.to_string(),
				r#type: *r#type,
			})
			.collect(),
	}
}

fn catalog() -> TestCatalog {
	TestCatalog {
		tables: vec![
			table("orders", &[("id", Type::Int8), ("customer", Type::Utf8), ("total", Type::Int8)]),
			table("customers", &[("id", Type::Int8), ("name", Type::Utf8)]),
		],
		views: vec![ViewDef {
			name: TableName::new("big_orders"),
			query: SelectStatement::new()
				.column(Expression::column("id"))
				.column(Expression::column("total"))
				.from(FromTable::table("orders"))
				.filter(Expression::binary(Expression::column("total"), Operator::Gt, Expression::constant(15))),
		}],
	}
}

fn compile(statement: SelectStatement) -> quarry_sql::Result<PlanNode> {
	compile_select(&catalog(), &SessionConfig::default(), &statement)
}

fn error_code(statement: SelectStatement) -> String {
	compile(statement).unwrap_err().code.clone()
}

fn names(columns: &[ColumnRef]) -> Vec<String> {
	columns.iter().map(ToString::to_string).collect()
}

#[test]
fn test_simple_projection() {
	let plan = compile(SelectStatement::new().column(Expression::column("id")).from(FromTable::table("orders"))).unwrap();

	let PlanNode::Single(SingleNode {
		child,
		op: SingleOp::Project {
			columns,
			aliases,
			given_name: None,
		},
	}) = plan
	else {
		panic!("expected a projection, got {:?}", plan);
	};
	assert_eq!(names(&columns), vec!["orders.id"]);
	assert_eq!(names(&aliases), vec!["orders.id"]);
	assert_eq!(
		*child,
		PlanNode::Fetch(FetchNode::Table {
			name: TableName::new("orders"),
			alias: None,
		})
	);
}

#[test]
fn test_header_names() {
	let catalog = catalog();
	let config = SessionConfig::default();
	let planner = Planner::new(&catalog, &config);
	let statement = SelectStatement::new()
		.column(Expression::column("o.id"))
		.column_as(Expression::column("total"), "amount")
		.column(Expression::binary(Expression::column("total"), Operator::Multiply, Expression::constant(2)))
		.from(FromTable::aliased("orders", "o"));

	let planned = planner.plan_select(&statement, None).unwrap();
	assert_eq!(names(&planned.header), vec!["o.id", "amount", "(o.total * 2)"]);
}

#[test]
fn test_glob_expansion() {
	let catalog = catalog();
	let config = SessionConfig::default();
	let planner = Planner::new(&catalog, &config);
	let statement = SelectStatement::new()
		.glob_of(TableName::new("c"))
		.column(Expression::column("o.id"))
		.from(FromTable::aliased("orders", "o"))
		.from(FromTable::aliased("customers", "c"));

	let planned = planner.plan_select(&statement, None).unwrap();
	assert_eq!(names(&planned.header), vec!["c.id", "c.name", "o.id"]);
}

#[test]
fn test_view_columns_take_view_name() {
	let catalog = catalog();
	let config = SessionConfig::default();
	let planner = Planner::new(&catalog, &config);
	let statement = SelectStatement::new().glob().from(FromTable::table("big_orders"));

	let planned = planner.plan_select(&statement, None).unwrap();
	assert_eq!(names(&planned.header), vec!["big_orders.id", "big_orders.total"]);

	let mut tables = vec![];
	planned.plan.discover_table_names(&mut tables);
	assert_eq!(tables, vec![TableName::new("orders")]);
	assert!(planned.plan.debug_string().contains("Fetch view big_orders"));
}

#[test]
fn test_equi_join_becomes_join_node() {
	let plan = compile(
		SelectStatement::new()
			.column(Expression::column("c.name"))
			.from(FromTable::aliased("orders", "o"))
			.from(FromTable::aliased("customers", "c"))
			.filter(
				Expression::binary(Expression::column("o.customer"), Operator::Equal, Expression::column("c.name"))
					.and(Expression::binary(Expression::column("o.id"), Operator::Equal, Expression::constant(1))),
			),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("Join o.customer = c.name"), "{}", rendered);
	assert!(rendered.contains("MultiColumnEquiSelect o.id = 1"), "{}", rendered);
	assert!(!rendered.contains("NaturalJoin"), "{}", rendered);
}

#[test]
fn test_inner_join_on_folds_into_search() {
	let plan = compile(
		SelectStatement::new()
			.column(Expression::column("c.name"))
			.from(FromTable::aliased("orders", "o"))
			.join(
				JoinType::Inner,
				FromTable::aliased("customers", "c"),
				Some(Expression::binary(Expression::column("o.customer"), Operator::Equal, Expression::column("c.name"))),
			),
	)
	.unwrap();

	assert!(plan.debug_string().contains("Join o.customer = c.name"));
}

#[test]
fn test_left_outer_join() {
	let plan = compile(
		SelectStatement::new()
			.glob()
			.from(FromTable::aliased("customers", "c"))
			.join(
				JoinType::LeftOuter,
				FromTable::aliased("orders", "o"),
				Some(Expression::binary(Expression::column("o.customer"), Operator::Equal, Expression::column("c.name"))),
			)
			.filter(Expression::binary(Expression::column("o.total"), Operator::Gt, Expression::constant(5))),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("LEFT OUTER JOIN on (o.customer = c.name)"), "{}", rendered);
	// the predicate on the null supplying side must run after the join
	let select = rendered.find("FunctionalSelect (o.total > 5)").unwrap();
	let join = rendered.find("LEFT OUTER JOIN").unwrap();
	assert!(select < join, "{}", rendered);
}

#[test]
fn test_group_by_with_aggregates() {
	let plan = compile(
		SelectStatement::new()
			.column(Expression::column("customer"))
			.column_as(Expression::call("sum", vec![Expression::column("total")]), "spent")
			.from(FromTable::table("orders"))
			.group_by(Expression::column("customer"))
			.having(Expression::binary(Expression::count_star(), Operator::Gt, Expression::constant(1)))
			.order_by(Expression::column("spent"), SortDirection::Desc),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("Group by orders.customer"), "{}", rendered);
	assert!(rendered.contains("FUNCTIONTABLE.#FN1_A := sum(orders.total)"), "{}", rendered);
	assert!(rendered.contains("FUNCTIONTABLE.HAVINGAG_1 := count(*)"), "{}", rendered);
	assert!(rendered.contains("FunctionalSelect (FUNCTIONTABLE.HAVINGAG_1 > 1)"), "{}", rendered);
	assert!(rendered.contains("Sort FUNCTIONTABLE.#FN1_A DESC"), "{}", rendered);
	assert!(rendered.contains("Project orders.customer, FUNCTIONTABLE.#FN1_A as spent"), "{}", rendered);
}

#[test]
fn test_group_by_alias_of_function() {
	let plan = compile(
		SelectStatement::new()
			.column_as(
				Expression::call("upper", vec![Expression::column("customer")]),
				"who",
			)
			.column(Expression::count_star())
			.from(FromTable::table("orders"))
			.group_by(Expression::column("who")),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("Functions FUNCTIONTABLE.#GROUPBY-1 := upper(orders.customer)"), "{}", rendered);
	assert!(rendered.contains("Group by FUNCTIONTABLE.#GROUPBY-1"), "{}", rendered);
}

#[test]
fn test_order_by_position_and_expression() {
	let plan = compile(
		SelectStatement::new()
			.column(Expression::column("id"))
			.column(Expression::column("total"))
			.from(FromTable::table("orders"))
			.order_by(Expression::constant(2), SortDirection::Desc)
			.order_by(
				Expression::binary(Expression::column("id"), Operator::Modulo, Expression::constant(2)),
				SortDirection::Asc,
			),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("Functions FUNCTIONTABLE.#ORDER-1 := (orders.id % 2)"), "{}", rendered);
	assert!(rendered.contains("Sort orders.total DESC, FUNCTIONTABLE.#ORDER-1 ASC"), "{}", rendered);
}

#[test]
fn test_correlated_subquery() {
	let inner = SelectStatement::new()
		.column(Expression::call("avg", vec![Expression::column("i.total")]))
		.from(FromTable::aliased("orders", "i"))
		.filter(Expression::binary(Expression::column("i.customer"), Operator::Equal, Expression::column("o.customer")));
	let plan = compile(
		SelectStatement::new()
			.column(Expression::column("o.id"))
			.from(FromTable::aliased("orders", "o"))
			.filter(Expression::binary(Expression::column("o.total"), Operator::Gt, Expression::subquery(inner))),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("FunctionalSelect (o.total > QUERY#1)"), "{}", rendered);
	assert!(rendered.contains("Query#1"), "{}", rendered);
	assert!(rendered.contains("MultiColumnEquiSelect i.customer = o.customer^1"), "{}", rendered);
	assert!(!plan.is_correlated());
}

#[test]
fn test_non_correlated_any() {
	let inner = SelectStatement::new().column(Expression::column("name")).from(FromTable::table("customers"));
	let plan = compile(
		SelectStatement::new().column(Expression::column("id")).from(FromTable::table("orders")).filter(
			Expression::quantified(
				Expression::column("customer"),
				Operator::Equal,
				Quantifier::Any,
				Expression::subquery(inner),
			),
		),
	)
	.unwrap();

	let PlanNode::Single(SingleNode {
		child,
		..
	}) = &plan
	else {
		panic!("expected a projection");
	};
	let PlanNode::Branch(branch) = child.as_ref() else {
		panic!("expected a branch, got {}", plan.debug_string());
	};
	assert!(matches!(
		&branch.op,
		BranchOp::NonCorrelatedAnyAll {
			quantifier: Quantifier::Any,
			..
		}
	));
}

#[test]
fn test_select_without_from() {
	let plan = compile(
		SelectStatement::new()
			.column(Expression::binary(Expression::constant(1), Operator::Add, Expression::constant(2)))
			.filter(Expression::binary(Expression::constant(1), Operator::Equal, Expression::constant(1))),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("SingleRow"), "{}", rendered);
	assert!(rendered.contains("ConstantSelect (1 = 1)"), "{}", rendered);
	assert!(rendered.contains("Functions FUNCTIONTABLE.#FN1 := (1 + 2)"), "{}", rendered);
}

#[test]
fn test_union_orders_by_output_column() {
	let plan = compile(
		SelectStatement::new()
			.column(Expression::column("id"))
			.from(FromTable::table("orders"))
			.composite(
				SetOperation::Union,
				false,
				SelectStatement::new().column(Expression::column("id")).from(FromTable::table("customers")),
			)
			.order_by(Expression::column("id"), SortDirection::Desc),
	)
	.unwrap();

	let rendered = plan.debug_string();
	assert!(rendered.contains("Composite UNION"), "{}", rendered);
	assert!(rendered.contains("Sort orders.id DESC"), "{}", rendered);
}

#[test]
fn test_unknown_source() {
	assert_eq!(error_code(SelectStatement::new().glob().from(FromTable::table("missing"))), "CATALOG_001");
}

#[test]
fn test_unknown_column() {
	assert_eq!(
		error_code(SelectStatement::new().column(Expression::column("price")).from(FromTable::table("orders"))),
		"QUERY_001"
	);
}

#[test]
fn test_ambiguous_column() {
	assert_eq!(
		error_code(
			SelectStatement::new()
				.column(Expression::column("id"))
				.from(FromTable::table("orders"))
				.from(FromTable::table("customers"))
		),
		"QUERY_002"
	);
}

#[test]
fn test_glob_of_unknown_source() {
	assert_eq!(
		error_code(SelectStatement::new().glob_of(TableName::new("x")).from(FromTable::table("orders"))),
		"QUERY_005"
	);
}

#[test]
fn test_duplicate_source() {
	assert_eq!(
		error_code(SelectStatement::new().glob().from(FromTable::table("orders")).from(FromTable::table("orders"))),
		"QUERY_006"
	);
}

#[test]
fn test_aggregate_without_from() {
	assert_eq!(error_code(SelectStatement::new().column(Expression::count_star())), "PLAN_001");
}

#[test]
fn test_aggregate_in_group_by() {
	assert_eq!(
		error_code(
			SelectStatement::new()
				.column(Expression::column("customer"))
				.from(FromTable::table("orders"))
				.group_by(Expression::call("sum", vec![Expression::column("total")]))
		),
		"PLAN_002"
	);
}

#[test]
fn test_composite_shape_mismatch() {
	assert_eq!(
		error_code(
			SelectStatement::new().column(Expression::column("id")).from(FromTable::table("orders")).composite(
				SetOperation::Union,
				true,
				SelectStatement::new().glob().from(FromTable::table("customers")),
			)
		),
		"PLAN_003"
	);
}

#[test]
fn test_outer_join_without_on() {
	assert_eq!(
		error_code(SelectStatement::new().glob().from(FromTable::table("orders")).join(
			JoinType::LeftOuter,
			FromTable::table("customers"),
			None
		)),
		"PLAN_004"
	);
}

#[test]
fn test_subquery_in_select_list() {
	let inner = SelectStatement::new().column(Expression::column("id")).from(FromTable::table("customers"));
	assert_eq!(
		error_code(SelectStatement::new().column(Expression::subquery(inner)).from(FromTable::table("orders"))),
		"PLAN_005"
	);
}

#[test]
fn test_order_by_not_resolved() {
	assert_eq!(
		error_code(
			SelectStatement::new()
				.column(Expression::column("id"))
				.from(FromTable::table("orders"))
				.order_by(Expression::column("price"), SortDirection::Asc)
		),
		"QUERY_003"
	);
}

#[test]
fn test_group_max_not_resolved() {
	assert_eq!(
		error_code(
			SelectStatement::new()
				.column(Expression::column("customer"))
				.from(FromTable::table("orders"))
				.group_by(Expression::column("customer"))
				.group_max("price")
		),
		"QUERY_004"
	);
}

#[test]
fn test_order_by_position_out_of_range() {
	for position in [0, 5] {
		assert_eq!(
			error_code(
				SelectStatement::new()
					.column(Expression::column("id"))
					.column(Expression::column("total"))
					.from(FromTable::table("orders"))
					.order_by(Expression::constant(position), SortDirection::Asc)
			),
			"QUERY_003"
		);
	}
}

#[test]
fn test_composite_order_by_position_out_of_range() {
	assert_eq!(
		error_code(
			SelectStatement::new()
				.column(Expression::column("id"))
				.from(FromTable::table("orders"))
				.composite(
					SetOperation::Union,
					false,
					SelectStatement::new().column(Expression::column("id")).from(FromTable::table("customers")),
				)
				.order_by(Expression::constant(2), SortDirection::Asc)
		),
		"QUERY_003"
	);
}

#[test]
fn test_composite_type_mismatch() {
	assert_eq!(
		error_code(
			SelectStatement::new().column(Expression::column("id")).from(FromTable::table("orders")).composite(
				SetOperation::Union,
				false,
				SelectStatement::new().column(Expression::column("name")).from(FromTable::table("customers")),
			)
		),
		"PLAN_003"
	);
}

#[test]
fn test_composite_types_through_view_and_functions() {
	// view columns keep their declared types, computed columns are not checked
	compile(
		SelectStatement::new().column(Expression::column("total")).from(FromTable::table("big_orders")).composite(
			SetOperation::Union,
			false,
			SelectStatement::new().column(Expression::column("id")).from(FromTable::table("customers")),
		),
	)
	.unwrap();
	compile(
		SelectStatement::new()
			.column(Expression::call("lower", vec![Expression::column("customer")]))
			.from(FromTable::table("orders"))
			.composite(
				SetOperation::Union,
				false,
				SelectStatement::new().column(Expression::column("id")).from(FromTable::table("customers")),
			),
	)
	.unwrap();
	assert_eq!(
		error_code(
			SelectStatement::new().column(Expression::column("id")).from(FromTable::table("big_orders")).composite(
				SetOperation::Union,
				false,
				SelectStatement::new().column(Expression::column("name")).from(FromTable::table("customers")),
			)
		),
		"PLAN_003"
	);
}

struct AggregatingCatalog(TestCatalog);

impl Catalog for AggregatingCatalog {
	fn find_table(&self, name: &TableName) -> Option<TableDef> {
		self.0.find_table(name)
	}

	fn find_view(&self, name: &TableName) -> Option<ViewDef> {
		self.0.find_view(name)
	}

	fn is_aggregate(&self, name: &str) -> bool {
		name == "total_of" || quarry_sql::expression::is_aggregate_function(name)
	}
}

#[test]
fn test_catalog_declares_aggregate() {
	let statement = SelectStatement::new()
		.column(Expression::column("customer"))
		.column(Expression::call("total_of", vec![Expression::column("total")]))
		.from(FromTable::table("orders"))
		.group_by(Expression::column("customer"));

	let plan = compile_select(&AggregatingCatalog(catalog()), &SessionConfig::default(), &statement).unwrap();
	let rendered = plan.debug_string();
	assert!(rendered.contains("Group by orders.customer"), "{}", rendered);
	assert!(rendered.contains("FUNCTIONTABLE.#FN1_A := total_of(orders.total)"), "{}", rendered);

	let plan = compile(statement).unwrap();
	assert!(plan.debug_string().contains("FUNCTIONTABLE.#FN1 := total_of(orders.total)"));
}
