//! Policy expansion: one declaration, many regions.

use std::sync::Arc;

use crate::options::{join_output, RegionOverride, RunOptions, ScopedOptions, DEFAULT_GLOBAL_REGION};
use crate::policy::{PolicyDeclaration, PolicySet};
use crate::session::SessionHandle;

use super::resolver::ResolvedRegions;
use super::RegionSet;

/// A declaration bound to one concrete region.
#[derive(Debug, Clone)]
pub struct ExpandedPolicyInstance {
    pub policy: Arc<PolicyDeclaration>,
    pub options: ScopedOptions,
    pub session: SessionHandle,
}

impl ExpandedPolicyInstance {
    pub fn name(&self) -> &str {
        &self.policy.name
    }

    pub fn region(&self) -> &str {
        self.options.region()
    }
}

/// Regions a declaration should target before availability filtering.
fn target_regions(
    available: &RegionSet,
    options: &RunOptions,
    resolved: &ResolvedRegions,
) -> Vec<String> {
    if available.is_empty() && !options.regions.is_empty() {
        // Global service: one representative region.
        let region = options.first_concrete_region().unwrap_or(DEFAULT_GLOBAL_REGION);
        return vec![region.to_owned()];
    }
    if options.wants_all_regions() {
        // Every enabled region is a candidate; the availability check in
        // `expand` narrows this to the intersection and logs what it drops.
        return match &resolved.enabled_regions {
            Some(enabled) => enabled.iter().cloned().collect(),
            None => {
                tracing::warn!("`all` requested but enabled regions were never resolved");
                Vec::new()
            }
        };
    }
    options.distinct_regions().into_iter().map(str::to_owned).collect()
}

/// Expand a single declaration.
///
/// Regions where the resource's service is not offered are skipped and
/// logged (debug under `all`, warn for an explicit list). A declaration
/// that matches no region yields nothing.
pub fn expand(
    policy: &PolicyDeclaration,
    resolved: &ResolvedRegions,
    options: &Arc<RunOptions>,
    session: &SessionHandle,
) -> Vec<ExpandedPolicyInstance> {
    let rtype = policy.unqualified_resource_type(&resolved.resource_prefix);
    let available = resolved.available_regions(rtype);
    let wants_all = options.wants_all_regions();
    let policy = Arc::new(policy.clone());

    let mut out = Vec::new();
    for region in target_regions(available, options, resolved) {
        if !available.is_empty() && !available.contains(&region) {
            if wants_all {
                tracing::debug!(policy = %policy.name, resource = %policy.resource_type, %region, "resource not available in region");
            } else {
                tracing::warn!(policy = %policy.name, resource = %policy.resource_type, %region, "resource not available in region");
            }
            continue;
        }

        let output_dir = match options.output_dir.as_deref() {
            Some(dir) if options.is_multi_region() => Some(join_output(dir, &region)),
            _ => None,
        };

        out.push(ExpandedPolicyInstance {
            policy: Arc::clone(&policy),
            options: ScopedOptions::new(Arc::clone(options), RegionOverride { region, output_dir }),
            session: Arc::clone(session),
        });
    }
    out
}

/// Expand every declaration of a set, in set order.
pub fn expand_set(
    policies: &PolicySet,
    resolved: &ResolvedRegions,
    options: &Arc<RunOptions>,
    session: &SessionHandle,
) -> Vec<ExpandedPolicyInstance> {
    policies
        .iter()
        .flat_map(|p| expand(p, resolved, options, session))
        .collect()
}
