//! Policy declarations and the policy file format.
//!
//! A policy file is a YAML document whose top-level `policies:` key holds an
//! ordered sequence of declarations. Declarations are parsed once and stay
//! read-only for the rest of the run.

pub mod declaration;
pub mod file;

pub use declaration::{PolicyDeclaration, PolicySet};
pub use file::{
    has_policies_header, load_policy_files, normalize_policies_document, parse_policy_str,
    wrap_policies_header,
};
