// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{self, Display, Formatter};

use crate::{Table, TableColumn};

fn display_width(s: &str) -> usize {
	s.chars().count()
}

fn escape_control_chars(s: &str) -> String {
	s.replace('\n', "\\n").replace('\t', "\\t")
}

fn extract_string_value(column: &TableColumn, row: usize) -> String {
	escape_control_chars(&column.data[row].to_string())
}

fn centered(s: &str, width: usize) -> String {
	let pad = width - display_width(s);
	let l = pad / 2;
	let r = pad - l;
	format!(" {:left$}{}{:right$} ", "", s, "", left = l, right = r)
}

impl Display for Table {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let mut widths: Vec<usize> = self.columns.iter().map(|c| display_width(&c.name.to_string())).collect();

		for row in 0..self.row_count() {
			for (idx, column) in self.columns.iter().enumerate() {
				widths[idx] = widths[idx].max(display_width(&extract_string_value(column, row)));
			}
		}

		for w in &mut widths {
			*w += 2;
		}

		let sep = format!("+{}+", widths.iter().map(|w| "-".repeat(*w + 2)).collect::<Vec<_>>().join("+"));
		writeln!(f, "{}", sep)?;

		let header = self
			.columns
			.iter()
			.zip(&widths)
			.map(|(column, w)| centered(&column.name.to_string(), *w))
			.collect::<Vec<_>>();
		writeln!(f, "|{}|", header.join("|"))?;
		writeln!(f, "{}", sep)?;

		for row in 0..self.row_count() {
			let cells = self
				.columns
				.iter()
				.zip(&widths)
				.map(|(column, w)| centered(&extract_string_value(column, row), *w))
				.collect::<Vec<_>>();
			writeln!(f, "|{}|", cells.join("|"))?;
		}

		writeln!(f, "{}", sep)
	}
}
