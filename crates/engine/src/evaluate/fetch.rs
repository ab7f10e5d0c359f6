// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use quarry_core::{Table, TableName};
use quarry_sql::plan::PlanNode;
use tracing::debug;

use crate::{context::ExecutionContext, evaluate::Evaluate};

pub(crate) fn table(ctx: &ExecutionContext<'_>, name: &TableName, alias: Option<&TableName>) -> crate::Result<Table> {
	let table = ctx.storage().scan(name)?;
	debug!(table = %name, rows = table.row_count(), "scanned table");
	Ok(table.qualify(Some(alias.unwrap_or(name))))
}

pub(crate) fn view(
	ctx: &ExecutionContext<'_>,
	name: &TableName,
	alias: Option<&TableName>,
	plan: &PlanNode,
) -> crate::Result<Table> {
	let table = plan.evaluate(ctx)?;
	debug!(view = %name, rows = table.row_count(), "materialized view");
	Ok(table.qualify(Some(alias.unwrap_or(name))))
}
