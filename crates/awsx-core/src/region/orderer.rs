use super::expander::ExpandedPolicyInstance;

/// Group instances by region, ascending.
///
/// The sort is stable: instances sharing a region keep their policy-set
/// order, so a sequential executor can reuse one regional session.
pub fn order(mut instances: Vec<ExpandedPolicyInstance>) -> Vec<ExpandedPolicyInstance> {
    instances.sort_by(|a, b| a.region().cmp(b.region()));
    instances
}
