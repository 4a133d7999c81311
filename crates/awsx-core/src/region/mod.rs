//! Region targeting for policy sets.
//!
//! Three steps, each usable on its own:
//! - [`resolver`]: look up per-service availability and, for `all`, the
//!   regions enabled for the account.
//! - [`expander`]: fan each declaration out to one instance per region.
//! - [`orderer`]: stable sort by region so consecutive instances share a
//!   region-scoped session.

pub mod expander;
pub mod orderer;
pub mod resolver;

pub use expander::{expand, expand_set, ExpandedPolicyInstance};
pub use orderer::order;
pub use resolver::{resolve, EnabledRegions, RegionCatalog, ResolvedRegions, StaticEnabledRegions};

use std::collections::BTreeSet;

/// Set of region names.
pub type RegionSet = BTreeSet<String>;
