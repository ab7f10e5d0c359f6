// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use super::Diagnostic;

pub trait DiagnosticRenderer {
	fn render(&self, diagnostic: &Diagnostic) -> String;
}

pub struct DefaultRenderer;

impl DiagnosticRenderer for DefaultRenderer {
	fn render(&self, d: &Diagnostic) -> String {
		let mut output = String::new();
		render_into(&mut output, d, 0);
		output
	}
}

fn render_into(output: &mut String, d: &Diagnostic, depth: usize) {
	let indent = "  ".repeat(depth);

	let _ = writeln!(output, "{}error[{}]: {}", indent, d.code, d.message);

	if let Some(statement) = &d.statement {
		let _ = writeln!(output, "{}  --> {}", indent, statement);
	}

	if let Some(label) = &d.label {
		let _ = writeln!(output, "{}   = {}", indent, label);
	}

	if let Some(col) = &d.column {
		let _ = writeln!(output, "\n{}note: column `{}` is of type `{}`", indent, col.name, col.r#type);
	}

	if let Some(help) = &d.help {
		let _ = writeln!(output, "\n{}help: {}", indent, help);
	}

	for note in &d.notes {
		let _ = writeln!(output, "\n{}note: {}", indent, note);
	}

	if let Some(cause) = &d.cause {
		let _ = writeln!(output, "\n{}caused by:", indent);
		render_into(output, cause, depth + 1);
	}
}

impl DefaultRenderer {
	pub fn render_string(diagnostic: &Diagnostic) -> String {
		DefaultRenderer.render(diagnostic)
	}
}
