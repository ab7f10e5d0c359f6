// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{Table, TableName};

/// Read access to base table data.
///
/// Locking and transactions are the caller's concern: the caller acquires the
/// locks for every table a plan discovers before evaluation starts.
pub trait Storage {
	/// Materializes every row of `table`. Columns are qualified by `table`.
	fn scan(&self, table: &TableName) -> crate::Result<Table>;
}

impl<S: Storage + ?Sized> Storage for &S {
	fn scan(&self, table: &TableName) -> crate::Result<Table> {
		(**self).scan(table)
	}
}
