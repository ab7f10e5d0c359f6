// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use context::{ExecutionContext, OuterRow};
pub use engine::Engine;
pub use evaluate::Evaluate;
pub use function::Functions;
pub use quarry_type::{Error, Result};

mod context;
mod engine;
mod evaluate;
pub mod expression;
pub mod function;
pub mod test_utils;
