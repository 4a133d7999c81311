//! Top-level facade crate for awsx.
//!
//! Re-exports the policy core and the provider library so users can depend
//! on a single crate.

pub mod core {
    pub use awsx_core::*;
}

pub mod provider {
    pub use awsx_provider::*;
}
