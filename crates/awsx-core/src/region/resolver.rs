//! Region availability resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AwsxError, Result};
use crate::options::RunOptions;
use crate::policy::PolicySet;

use super::RegionSet;

static NO_REGIONS: RegionSet = RegionSet::new();

/// Service availability data, supplied from outside.
///
/// ```yaml
/// services:
///   sqs: [us-east-1, us-west-2]
/// resources:
///   sqs: sqs
///   graphql-api: appsync
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionCatalog {
    /// service id -> regions offering it
    #[serde(default)]
    pub services: BTreeMap<String, RegionSet>,
    /// resource type -> service id
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
}

impl RegionCatalog {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| AwsxError::Config(format!("read catalog {} failed: {e}", path.display())))?;
        Self::load_from_str(&s)
    }

    pub fn load_from_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| AwsxError::Config(format!("invalid catalog yaml: {e}")))
    }

    /// Map a resource type to its service unless the catalogue already does.
    pub fn with_resource(mut self, resource_type: &str, service: &str) -> Self {
        self.resources
            .entry(resource_type.to_owned())
            .or_insert_with(|| service.to_owned());
        self
    }
}

/// Source of the regions enabled for the active credentials.
///
/// Implementations should only report regions whose opt-in status is
/// `opt-in-not-required` or `opted-in`.
pub trait EnabledRegions {
    fn enabled_regions(&self, options: &RunOptions) -> Result<RegionSet>;
}

/// Fixed answer, for configuration-driven runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnabledRegions(pub RegionSet);

impl EnabledRegions for StaticEnabledRegions {
    fn enabled_regions(&self, _options: &RunOptions) -> Result<RegionSet> {
        Ok(self.0.clone())
    }
}

/// Output of [`resolve`], input of expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRegions {
    /// Provider prefix stripped from resource types before lookup.
    pub resource_prefix: String,
    pub service_region_map: BTreeMap<String, RegionSet>,
    pub resource_service_map: BTreeMap<String, String>,
    /// `None` unless `all` was requested.
    pub enabled_regions: Option<RegionSet>,
}

impl ResolvedRegions {
    /// Regions offering the service behind `resource_type`.
    ///
    /// Unknown resource types and unknown services both yield the empty set,
    /// which callers treat as a global service.
    pub fn available_regions(&self, resource_type: &str) -> &RegionSet {
        self.resource_service_map
            .get(resource_type)
            .and_then(|svc| self.service_region_map.get(svc))
            .unwrap_or(&NO_REGIONS)
    }
}

/// Resolve region data for every resource type used by `policies`.
///
/// The enabled-region lookup only happens when `options.regions` contains
/// `all`; its failure, or an empty answer, aborts with
/// [`AwsxError::Resolution`].
pub fn resolve(
    options: &RunOptions,
    policies: &PolicySet,
    catalog: &RegionCatalog,
    directory: &dyn EnabledRegions,
    resource_prefix: &str,
) -> Result<ResolvedRegions> {
    let mut resource_service_map = BTreeMap::new();
    let mut service_region_map = BTreeMap::new();

    for p in policies {
        let rtype = p.unqualified_resource_type(resource_prefix);
        let Some(svc) = catalog.resources.get(rtype) else {
            tracing::debug!(policy = %p.name, resource = %p.resource_type, "no service mapping");
            continue;
        };
        resource_service_map.insert(rtype.to_owned(), svc.clone());
        if let Some(regions) = catalog.services.get(svc) {
            service_region_map.insert(svc.clone(), regions.clone());
        }
    }

    let enabled_regions = if options.wants_all_regions() {
        let enabled = directory
            .enabled_regions(options)
            .map_err(|e| AwsxError::Resolution(format!("cannot enumerate enabled regions: {e}")))?;
        if enabled.is_empty() {
            return Err(AwsxError::Resolution(
                "no enabled regions reported for the active credentials".into(),
            ));
        }
        tracing::debug!(count = enabled.len(), "enabled regions resolved");
        Some(enabled)
    } else {
        None
    };

    Ok(ResolvedRegions {
        resource_prefix: resource_prefix.to_owned(),
        service_region_map,
        resource_service_map,
        enabled_regions,
    })
}
