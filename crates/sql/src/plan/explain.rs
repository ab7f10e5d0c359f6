// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::Write;

use crate::{
	expression::Expression,
	plan::{BranchNode, BranchOp, FetchNode, PlanNode, SingleNode, SingleOp},
};

fn join<T: ToString>(items: &[T]) -> String {
	items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl PlanNode {
	/// One line describing this node, without its children.
	pub fn title(&self) -> String {
		match self {
			PlanNode::Fetch(FetchNode::Table {
				name,
				alias,
			}) => match alias {
				Some(alias) => format!("Fetch table {} as {}", name, alias),
				None => format!("Fetch table {}", name),
			},
			PlanNode::Fetch(FetchNode::View {
				name,
				alias,
				..
			}) => match alias {
				Some(alias) => format!("Fetch view {} as {}", name, alias),
				None => format!("Fetch view {}", name),
			},
			PlanNode::Fetch(FetchNode::SingleRow) => "SingleRow".to_string(),
			PlanNode::Single(SingleNode {
				op,
				..
			}) => match op {
				SingleOp::FunctionalSelect {
					predicate,
				} => format!("FunctionalSelect {}", predicate),
				SingleOp::ConstantSelect {
					predicate,
				} => format!("ConstantSelect {}", predicate),
				SingleOp::PatternSelect {
					predicate,
				} => format!("PatternSelect {}", predicate),
				SingleOp::MultiColumnEquiSelect {
					columns,
					values,
				} => {
					let pairs = columns
						.iter()
						.zip(values)
						.map(|(c, v)| format!("{} = {}", c, v))
						.collect::<Vec<_>>()
						.join(", ");
					format!("MultiColumnEquiSelect {}", pairs)
				}
				SingleOp::Functions {
					functions,
				} => {
					let functions = functions
						.iter()
						.map(|f| format!("{} := {}", f.name, f.expression))
						.collect::<Vec<_>>()
						.join(", ");
					format!("Functions {}", functions)
				}
				SingleOp::Group {
					group_by,
					group_max,
					functions,
				} => {
					let mut title = if group_by.is_empty() {
						"Group all".to_string()
					} else {
						format!("Group by {}", join(group_by))
					};
					if let Some(group_max) = group_max {
						let _ = write!(title, " max {}", group_max);
					}
					if !functions.is_empty() {
						let functions = functions
							.iter()
							.map(|f| format!("{} := {}", f.name, f.expression))
							.collect::<Vec<_>>()
							.join(", ");
						let _ = write!(title, " computing {}", functions);
					}
					title
				}
				SingleOp::Sort {
					columns,
					directions,
				} => {
					let keys = columns
						.iter()
						.zip(directions)
						.map(|(c, d)| format!("{} {}", c, d))
						.collect::<Vec<_>>()
						.join(", ");
					format!("Sort {}", keys)
				}
				SingleOp::Distinct {
					columns,
				} => format!("Distinct {}", join(columns)),
				SingleOp::Project {
					columns,
					aliases,
					given_name,
				} => {
					let columns = columns
						.iter()
						.zip(aliases)
						.map(|(c, a)| {
							if c == a {
								c.to_string()
							} else {
								format!("{} as {}", c, a)
							}
						})
						.collect::<Vec<_>>()
						.join(", ");
					match given_name {
						Some(name) => format!("Project {} into {}", columns, name),
						None => format!("Project {}", columns),
					}
				}
			},
			PlanNode::Branch(BranchNode {
				op,
				..
			}) => match op {
				BranchOp::Join {
					column,
					operator,
					expression,
				} => format!("Join {} {} {}", column, operator, expression),
				BranchOp::NaturalJoin => "NaturalJoin".to_string(),
				BranchOp::OuterJoin {
					kind,
					on,
				} => format!("{} on {}", kind, on),
				BranchOp::Composite {
					operation,
					all,
				} => {
					if *all {
						format!("Composite {} ALL", operation)
					} else {
						format!("Composite {}", operation)
					}
				}
				BranchOp::NonCorrelatedAnyAll {
					columns,
					operator,
					quantifier,
				} => format!("NonCorrelatedAnyAll ({}) {} {}", join(columns), operator, quantifier),
			},
		}
	}

	/// Renders the whole tree, one node per line. Sub-queries embedded in
	/// expressions and view plans are rendered below their node.
	pub fn debug_string(&self) -> String {
		let mut output = String::new();
		render_plan_inner(self, "", true, &mut output);
		output
	}
}

fn render_plan_inner(plan: &PlanNode, prefix: &str, is_last: bool, output: &mut String) {
	let branch = if is_last {
		"└──"
	} else {
		"├──"
	};
	let child_prefix = format!(
		"{}{}",
		prefix,
		if is_last {
			"    "
		} else {
			"│   "
		}
	);

	output.push_str(&format!("{}{} {}\n", prefix, branch, plan.title()));

	let mut nested: Vec<(String, &PlanNode)> = Vec::new();
	if let PlanNode::Fetch(FetchNode::View {
		plan: view,
		..
	}) = plan
	{
		nested.push(("View".to_string(), view));
	}
	for expression in plan.expressions() {
		for cache_point in Expression::queries(expression) {
			nested.push((format!("Query#{}", cache_point.id), &cache_point.plan));
		}
	}

	let children = plan.children();
	let total = nested.len() + children.len();
	let mut idx = 0;
	for (label, nested_plan) in nested {
		idx += 1;
		let last = idx == total;
		let (nested_branch, nested_prefix) = if last {
			("└──", format!("{}    ", child_prefix))
		} else {
			("├──", format!("{}│   ", child_prefix))
		};
		output.push_str(&format!("{}{} {}\n", child_prefix, nested_branch, label));
		render_plan_inner(nested_plan, &nested_prefix, true, output);
	}
	for child in children {
		idx += 1;
		render_plan_inner(child, &child_prefix, idx == total, output);
	}
}
