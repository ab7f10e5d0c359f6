// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::{SortDirection, Table};

impl Table {
	/// Orders `rows` by a single column.
	///
	/// The rows are stably sorted ascending and the result is reversed for a
	/// descending order, so ties come out in reverse input order when
	/// descending. Multi key ordering composes these passes.
	pub fn order_by_column(&self, rows: &[usize], column: usize, direction: SortDirection) -> Vec<usize> {
		let data = &self.columns[column].data;
		let mut result = rows.to_vec();
		result.sort_by(|l, r| data[*l].sort_cmp(&data[*r]));
		if !direction.is_ascending() {
			result.reverse();
		}
		result
	}

	/// Orders all rows by several columns, the first key being the most
	/// significant.
	pub fn order_by(&self, keys: &[(usize, SortDirection)]) -> Vec<usize> {
		let mut directions: Vec<SortDirection> = keys.iter().map(|(_, d)| *d).collect();
		// a descending pass reverses the ties left by every less significant pass
		for i in 0..directions.len() {
			if !directions[i].is_ascending() {
				for direction in directions.iter_mut().skip(i + 1) {
					*direction = direction.reverse();
				}
			}
		}

		let mut rows: Vec<usize> = (0..self.row_count()).collect();
		for (i, (column, _)) in keys.iter().enumerate().rev() {
			rows = self.order_by_column(&rows, *column, directions[i]);
		}
		rows
	}
}
