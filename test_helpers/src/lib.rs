//! Shared test helpers for the strata-config workspace.
//!
//! Currently this crate carries only the [`env`] module: RAII guards for
//! mutating process environment variables from tests without the suites
//! racing one another.

pub mod env;
