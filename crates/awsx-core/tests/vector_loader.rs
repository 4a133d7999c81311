//! YAML expansion vector loader shared by region tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use serde::Deserialize;

use awsx_core::policy::PolicyDeclaration;
use awsx_core::region::{RegionCatalog, RegionSet};

#[derive(Debug, Deserialize)]
pub struct ExpansionVector {
    pub description: String,
    pub regions: Vec<String>,
    #[serde(default)]
    pub enabled: Option<RegionSet>,
    #[serde(default)]
    pub output_dir: Option<String>,
    pub catalog: RegionCatalog,
    pub policies: Vec<PolicyDeclaration>,
    #[serde(default)]
    pub expect: Option<Vec<ExpectedInstance>>,
    #[serde(default)]
    pub expect_error: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ExpectedInstance {
    pub policy: String,
    pub region: String,
    #[serde(default)]
    pub output_dir: Option<String>,
}

pub fn load(name: &str) -> ExpansionVector {
    let s = std::fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_yaml::from_str(&s).unwrap_or_else(|e| panic!("vector {name}: {e}"))
}
