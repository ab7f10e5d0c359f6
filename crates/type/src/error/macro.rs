// SPDX-License-Identifier: MIT
// Copyright (c) 2025 ReifyDB

/// Wraps a diagnostic into an [`Error`](crate::Error).
///
/// ```ignore
/// let err = error!(query::column_not_found("price"));
/// ```
#[macro_export]
macro_rules! error {
	($diagnostic:expr) => {
		$crate::Error($crate::IntoDiagnostic::into_diagnostic($diagnostic))
	};
}

/// Wraps a diagnostic into `Err(Error)`.
#[macro_export]
macro_rules! err {
	($diagnostic:expr) => {
		Err($crate::error!($diagnostic))
	};
}

/// Returns early with `Err(Error)` built from a diagnostic.
#[macro_export]
macro_rules! return_error {
	($diagnostic:expr) => {
		return $crate::err!($diagnostic)
	};
}
