// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::PlanError;
pub use quarry_type::{Error, Result};

pub mod catalog;
mod error;
pub mod expression;
pub mod plan;
pub mod select;
