// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Depth first evaluation of plan trees. Every node materializes its
//! children completely before combining them; errors of a child are returned
//! unchanged.

use quarry_core::{ColumnRef, Table};
use quarry_sql::plan::{BranchNode, BranchOp, FetchNode, PlanNode, SingleNode, SingleOp};
use tracing::instrument;

use crate::context::ExecutionContext;

mod fetch;
mod filter;
mod group;
mod join;
mod shape;

pub trait Evaluate {
	fn evaluate(&self, ctx: &ExecutionContext<'_>) -> crate::Result<Table>;
}

impl Evaluate for PlanNode {
	#[instrument(name = "engine::evaluate", level = "trace", skip_all, fields(node = %self.title()))]
	fn evaluate(&self, ctx: &ExecutionContext<'_>) -> crate::Result<Table> {
		match self {
			PlanNode::Fetch(fetch) => evaluate_fetch(fetch, ctx),
			PlanNode::Single(single) => evaluate_single(single, ctx),
			PlanNode::Branch(branch) => evaluate_branch(branch, ctx),
		}
	}
}

fn evaluate_fetch(fetch: &FetchNode, ctx: &ExecutionContext<'_>) -> crate::Result<Table> {
	match fetch {
		FetchNode::Table {
			name,
			alias,
		} => fetch::table(ctx, name, alias.as_ref()),
		FetchNode::View {
			name,
			alias,
			plan,
		} => fetch::view(ctx, name, alias.as_ref(), plan),
		FetchNode::SingleRow => Ok(Table::single_row()),
	}
}

fn evaluate_single(single: &SingleNode, ctx: &ExecutionContext<'_>) -> crate::Result<Table> {
	let child = single.child.evaluate(ctx)?;
	match &single.op {
		SingleOp::FunctionalSelect {
			predicate,
		} => filter::functional(ctx, child, predicate),
		SingleOp::ConstantSelect {
			predicate,
		} => filter::constant(ctx, child, predicate),
		SingleOp::PatternSelect {
			predicate,
		} => filter::pattern(ctx, child, predicate),
		SingleOp::MultiColumnEquiSelect {
			columns,
			values,
		} => filter::multi_column_equi(ctx, child, columns, values),
		SingleOp::Functions {
			functions,
		} => shape::functions(ctx, child, functions),
		SingleOp::Group {
			group_by,
			group_max,
			functions,
		} => group::group(ctx, child, group_by, group_max.as_ref(), functions),
		SingleOp::Sort {
			columns,
			directions,
		} => shape::sort(ctx, child, columns, directions),
		SingleOp::Distinct {
			columns,
		} => shape::distinct(ctx, child, columns),
		SingleOp::Project {
			columns,
			aliases,
			given_name,
		} => shape::project(ctx, child, columns, aliases, given_name.as_ref()),
	}
}

fn evaluate_branch(branch: &BranchNode, ctx: &ExecutionContext<'_>) -> crate::Result<Table> {
	let left = branch.left.evaluate(ctx)?;
	let right = branch.right.evaluate(ctx)?;
	match &branch.op {
		BranchOp::Join {
			column,
			operator,
			expression,
		} => join::join(ctx, &left, &right, column, *operator, expression),
		BranchOp::NaturalJoin => Ok(Table::product(&left, &right)),
		BranchOp::OuterJoin {
			kind,
			on,
		} => join::outer(ctx, &left, &right, *kind, on),
		BranchOp::Composite {
			operation,
			all,
		} => left.combine(&right, *operation, *all),
		BranchOp::NonCorrelatedAnyAll {
			columns,
			operator,
			quantifier,
		} => filter::any_all(ctx, left, &right, columns, *operator, *quantifier),
	}
}

pub(crate) fn find_columns(ctx: &ExecutionContext<'_>, table: &Table, columns: &[ColumnRef]) -> crate::Result<Vec<usize>> {
	columns.iter().map(|column| table.find_column(column, ctx.config())).collect()
}
