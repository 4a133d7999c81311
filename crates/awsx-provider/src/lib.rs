//! awsx provider library entry.
//!
//! This crate wires the `awsx` provider into the host policy engine: plugin
//! registries and resource descriptors, provider initialisation and region
//! expansion, the engine CLI runner, the documentation example checkers and
//! the web policy validator. It is consumed by the `awsx` binary
//! (`main.rs`) and by integration tests.

pub mod checker;
pub mod config;
pub mod docs;
pub mod engine;
pub mod obs;
pub mod ops;
pub mod provider;
pub mod registry;
pub mod resources;
