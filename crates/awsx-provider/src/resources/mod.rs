//! Resource types contributed by the `awsx` provider.
//!
//! Resources are descriptors: they tell the engine which service to call,
//! how to enumerate instances and which fields identify them. The SDK calls
//! themselves belong to the engine.

pub mod graphql_api;
pub mod sqs;

use std::sync::Arc;

pub use graphql_api::GraphQlApi;
pub use sqs::Queue;

/// Enumeration call: operation, response path, fixed request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    pub operation: &'static str,
    pub path: &'static str,
    pub params: &'static [(&'static str, &'static str)],
}

/// Static metadata for a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Service id used for region availability lookups.
    pub service: &'static str,
    pub enum_spec: EnumSpec,
    /// Per-resource detail call and the key it takes, if any.
    pub detail_spec: Option<(&'static str, &'static str)>,
    pub id: &'static str,
    pub name: &'static str,
    pub arn: &'static str,
    pub arn_type: Option<&'static str>,
    pub cfn_type: &'static str,
    pub universal_taggable: bool,
    pub permissions: &'static [&'static str],
}

/// A resource type the provider can register.
pub trait ResourceType: Send + Sync {
    /// Unqualified name (`sqs`); registered as `<prefix>.<name>`.
    fn resource_name(&self) -> &'static str;
    fn type_info(&self) -> &'static TypeInfo;
}

/// Resource types registered by [`crate::provider::Awsx::new`], in order.
pub fn builtin() -> Vec<Arc<dyn ResourceType>> {
    vec![Arc::new(Queue), Arc::new(GraphQlApi)]
}
