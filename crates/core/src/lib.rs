// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use common::{JoinType, SortDirection};
pub use config::SessionConfig;
pub use name::{ColumnRef, FUNCTION_TABLE, TableName};
pub use quarry_type::{Error, Result};
pub use table::{Table, TableColumn};

mod common;
mod config;
pub mod interface;
mod name;
pub mod table;
