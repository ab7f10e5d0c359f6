// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
	Inner,
	LeftOuter,
	RightOuter,
	FullOuter,
	None,
}

impl JoinType {
	pub fn is_outer(&self) -> bool {
		matches!(self, JoinType::LeftOuter | JoinType::RightOuter | JoinType::FullOuter)
	}
}

impl Display for JoinType {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			JoinType::Inner => f.write_str("INNER JOIN"),
			JoinType::LeftOuter => f.write_str("LEFT OUTER JOIN"),
			JoinType::RightOuter => f.write_str("RIGHT OUTER JOIN"),
			JoinType::FullOuter => f.write_str("FULL OUTER JOIN"),
			JoinType::None => f.write_str("NO JOIN"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
	Asc,
	Desc,
}

impl SortDirection {
	pub fn is_ascending(&self) -> bool {
		matches!(self, SortDirection::Asc)
	}

	pub fn reverse(&self) -> Self {
		match self {
			SortDirection::Asc => SortDirection::Desc,
			SortDirection::Desc => SortDirection::Asc,
		}
	}
}

impl Display for SortDirection {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			SortDirection::Asc => f.write_str("ASC"),
			SortDirection::Desc => f.write_str("DESC"),
		}
	}
}
