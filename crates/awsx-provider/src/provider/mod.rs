//! The `awsx` provider.
//!
//! Fills in option defaults, describes sessions, and turns a policy set into
//! a region-ordered [`PolicyCollection`] using the core resolve/expand/order
//! pipeline.

pub mod defaults;
pub mod regions;

use std::path::Path;
use std::sync::Arc;

use awsx_core::error::{AwsxError, Result};
use awsx_core::options::RunOptions;
use awsx_core::policy::{load_policy_files, PolicySet};
use awsx_core::region::{self, EnabledRegions, ExpandedPolicyInstance, RegionCatalog};
use awsx_core::session::SessionFactory;

use crate::registry::PluginRegistry;
use crate::resources::{self, ResourceType};

pub use regions::AwsCliEnabledRegions;

/// Resource types keyed by qualified name (`awsx.sqs`).
pub type ResourceRegistry = PluginRegistry<dyn ResourceType>;

/// A cloud provider as seen by the host engine.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    fn resource_prefix(&self) -> &'static str;
    fn resources(&self) -> &ResourceRegistry;

    /// Fill in defaults that depend on the environment.
    fn initialize(&self, options: RunOptions) -> Result<RunOptions>;

    fn session_factory(&self, options: &RunOptions) -> SessionFactory;

    /// Policies targeted at the requested regions, grouped by region.
    fn initialize_policies(&self, policies: &PolicySet, options: RunOptions)
        -> Result<PolicyCollection>;
}

/// Region-ordered policy instances plus the options they were built from.
#[derive(Debug, Clone)]
pub struct PolicyCollection {
    instances: Vec<ExpandedPolicyInstance>,
    options: Arc<RunOptions>,
}

impl PolicyCollection {
    pub fn instances(&self) -> &[ExpandedPolicyInstance] {
        &self.instances
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Distinct regions in execution order.
    pub fn regions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for i in &self.instances {
            if out.last() != Some(&i.region()) {
                out.push(i.region());
            }
        }
        out
    }
}

pub struct Awsx {
    resources: ResourceRegistry,
    catalog: RegionCatalog,
    directory: Box<dyn EnabledRegions + Send + Sync>,
}

impl Awsx {
    pub const NAME: &'static str = "awsx";

    /// Build the provider and register its resource types.
    ///
    /// Each registered resource also maps its name to its service in the
    /// catalogue, unless the catalogue already says otherwise.
    pub fn new(
        catalog: RegionCatalog,
        directory: Box<dyn EnabledRegions + Send + Sync>,
    ) -> Result<Self> {
        let resources = PluginRegistry::new(format!("{}.resources", Self::NAME));
        let mut catalog = catalog;
        for rt in resources::builtin() {
            let key = format!("{}.{}", Self::NAME, rt.resource_name());
            catalog = catalog.with_resource(rt.resource_name(), rt.type_info().service);
            resources.register(&key, rt)?;
        }
        Ok(Self { resources, catalog, directory })
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Check the policy files among engine arguments before handing over.
    ///
    /// Existing `*.yml`/`*.yaml` arguments are parsed and their `awsx.*`
    /// types checked against the registry; everything else is left to the
    /// engine. Returns the number of policies checked.
    pub fn check_policy_args(&self, args: &[String]) -> Result<usize> {
        let mut checked = 0;
        for arg in args {
            let path = Path::new(arg);
            let is_yaml = path.extension().is_some_and(|x| x == "yml" || x == "yaml");
            if !is_yaml || !path.is_file() {
                continue;
            }
            let set = load_policy_files(&[path])?;
            self.check_resource_types(&set)?;
            checked += set.len();
        }
        Ok(checked)
    }

    /// Reject `awsx.*` resource types that were never registered.
    fn check_resource_types(&self, policies: &PolicySet) -> Result<()> {
        let prefix = format!("{}.", Self::NAME);
        for p in policies {
            if p.resource_type.starts_with(&prefix) && !self.resources.contains(&p.resource_type) {
                return Err(AwsxError::InvalidPolicy(format!(
                    "policy {}: unknown resource type {} (known: {})",
                    p.name,
                    p.resource_type,
                    self.resources.keys().join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl Provider for Awsx {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn display_name(&self) -> &'static str {
        "AWSX"
    }

    fn resource_prefix(&self) -> &'static str {
        Self::NAME
    }

    fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    fn initialize(&self, options: RunOptions) -> Result<RunOptions> {
        defaults::apply(options, &|key| std::env::var(key).ok())
    }

    fn session_factory(&self, options: &RunOptions) -> SessionFactory {
        SessionFactory::from_options(options)
    }

    fn initialize_policies(
        &self,
        policies: &PolicySet,
        options: RunOptions,
    ) -> Result<PolicyCollection> {
        self.check_resource_types(policies)?;

        let resolved = region::resolve(
            &options,
            policies,
            &self.catalog,
            self.directory.as_ref(),
            self.resource_prefix(),
        )?;

        let options = Arc::new(options);
        let session = self.session_factory(&options).into_handle();
        let instances = region::order(region::expand_set(policies, &resolved, &options, &session));

        tracing::info!(
            policies = policies.len(),
            instances = instances.len(),
            regions = ?options.regions,
            "policies initialized"
        );
        Ok(PolicyCollection { instances, options })
    }
}
