// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Compiles a [`SelectStatement`] into a tree of [`PlanNode`]s.
//!
//! Each SELECT block is planned on its own: its sources are collected into a
//! [`FromSet`], the select list is split into variables and functions by the
//! [`ColumnSet`], and the search expression is distributed over the sources by
//! the [`TableSourcePlanner`]. Sub-queries of expressions are planned against
//! the enclosing from-set and appear in the tree as cache points.

use quarry_core::SessionConfig;

use crate::{catalog::Catalog, select::SelectStatement};

mod column_set;
mod discover;
mod explain;
mod from_set;
mod node;
mod planner;
mod table_source;

pub use column_set::{ColumnSet, SelectColumn};
pub use from_set::{FromSet, FromTableSource, Resolved};
pub use node::{BranchNode, BranchOp, FetchNode, FunctionColumn, PlanNode, SingleNode, SingleOp};
pub use planner::{PlannedSelect, Planner};
pub use table_source::{JoinEdge, TableSourcePlan, TableSourcePlanner};

pub fn compile_select(catalog: &dyn Catalog, config: &SessionConfig, statement: &SelectStatement) -> crate::Result<PlanNode> {
	Planner::new(catalog, config).compile(statement)
}
