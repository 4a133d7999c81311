use super::{EnumSpec, ResourceType, TypeInfo};

/// Message queue (`awsx.sqs`).
#[derive(Debug, Default)]
pub struct Queue;

static QUEUE_INFO: TypeInfo = TypeInfo {
    service: "sqs",
    enum_spec: EnumSpec {
        operation: "list_queues",
        path: "QueueUrls",
        params: &[],
    },
    detail_spec: Some(("get_queue_attributes", "QueueUrl")),
    id: "QueueUrl",
    name: "QueueUrl",
    arn: "QueueArn",
    arn_type: None,
    cfn_type: "AWS::SQS::Queue",
    universal_taggable: true,
    permissions: &["sqs:ListQueues", "sqs:GetQueueAttributes", "sqs:ListQueueTags"],
};

impl ResourceType for Queue {
    fn resource_name(&self) -> &'static str {
        "sqs"
    }

    fn type_info(&self) -> &'static TypeInfo {
        &QUEUE_INFO
    }
}
