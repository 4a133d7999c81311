//! awsx core: policy model, region expansion, linting and policy building.
//!
//! This crate holds everything the `awsx` provider needs that does not touch
//! a process, a socket or an async runtime: the policy declaration model and
//! its YAML file format, run options, the region resolve/expand/order
//! pipeline, the policy linter, and the fluent policy builder.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible
//! path surfaces as `AwsxError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod builder;
pub mod error;
pub mod lint;
pub mod options;
pub mod policy;
pub mod region;
pub mod session;

/// Shared result type.
pub use error::{AwsxError, Result};
