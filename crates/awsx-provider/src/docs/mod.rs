//! Documentation example checkers.
//!
//! Extract YAML examples from `.rst` pages and Python docstrings, then run
//! them through the engine's `validate` (or a dry run) and report failures.

pub mod extract;
pub mod validate;

pub use extract::{
    extract_docstrings, extract_python_tree, extract_rst_dir, fix_policies_file,
    strip_annotations, yaml_blocks_in_python, yaml_blocks_in_rst, ExtractReport,
};
pub use validate::{
    collect_yaml_files, default_concurrency, dry_run_files, report_failures, validate_file,
    validate_files, FileResult, ValidationReport, ValidatorRules, Verdict,
};
