use super::{EnumSpec, ResourceType, TypeInfo};

/// Managed GraphQL API (`awsx.graphql-api`).
#[derive(Debug, Default)]
pub struct GraphQlApi;

static GRAPHQL_API_INFO: TypeInfo = TypeInfo {
    service: "appsync",
    enum_spec: EnumSpec {
        operation: "list_graphql_apis",
        path: "graphqlApis",
        params: &[("apiType", "GRAPHQL")],
    },
    detail_spec: None,
    id: "apiId",
    name: "name",
    arn: "arn",
    arn_type: Some("apis"),
    cfn_type: "AWS::AppSync::GraphQLApi",
    universal_taggable: true,
    permissions: &["appsync:ListGraphqlApis", "appsync:ListTagsForResource"],
};

impl ResourceType for GraphQlApi {
    fn resource_name(&self) -> &'static str {
        "graphql-api"
    }

    fn type_info(&self) -> &'static TypeInfo {
        &GRAPHQL_API_INFO
    }
}
