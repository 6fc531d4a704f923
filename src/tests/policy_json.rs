//! Document-level checks on the serialized policy JSON: the wire shape the
//! provider actually receives.

use crate::execution::{execution_statements, runtime_trust};
use crate::types::{DeployContext, PolicyDocument};

const ACCOUNT: &str = "123456789012";
const REGION: &str = "us-east-1";

fn ctx() -> DeployContext {
    DeployContext::new(ACCOUNT, REGION).unwrap()
}

fn execution_document() -> serde_json::Value {
    let statements =
        execution_statements(&ctx(), "agentcore-rust-agent-repo", "rust_agent").unwrap();
    serde_json::to_value(PolicyDocument::new(statements)).unwrap()
}

#[test]
fn test_document_version_and_count() {
    let document = execution_document();
    assert_eq!(document["Version"], "2012-10-17");
    assert_eq!(document["Statement"].as_array().unwrap().len(), 9);
}

#[test]
fn test_no_placeholder_residue_anywhere() {
    let rendered = execution_document().to_string();
    for residue in ["${", "{}", "<", ">", "REPO_", "AGENT_"] {
        assert!(
            !rendered.contains(residue),
            "serialized document contains '{residue}'"
        );
    }
}

#[test]
fn test_every_resource_is_pinned_or_documented() {
    let document = execution_document();
    let exceptions = [
        "*",
        "arn:aws:bedrock:*::foundation-model/*",
    ];
    for statement in document["Statement"].as_array().unwrap() {
        for resource in statement["Resource"].as_array().unwrap() {
            let resource = resource.as_str().unwrap();
            if exceptions.contains(&resource) {
                continue;
            }
            assert!(
                resource.contains(ACCOUNT) && resource.contains(REGION),
                "resource not pinned to account/region: {resource}"
            );
        }
    }
}

#[test]
fn test_image_access_statement_wire_shape() {
    let document = execution_document();
    assert_eq!(
        document["Statement"][0],
        serde_json::json!({
            "Sid": "ECRImageAccess",
            "Effect": "Allow",
            "Action": ["ecr:BatchGetImage", "ecr:GetDownloadUrlForLayer"],
            "Resource": [
                "arn:aws:ecr:us-east-1:123456789012:repository/agentcore-rust-agent-repo"
            ]
        })
    );
}

#[test]
fn test_token_statement_wire_shape() {
    let document = execution_document();
    assert_eq!(
        document["Statement"][7],
        serde_json::json!({
            "Sid": "GetAgentAccessToken",
            "Effect": "Allow",
            "Action": [
                "bedrock-agentcore:GetWorkloadAccessToken",
                "bedrock-agentcore:GetWorkloadAccessTokenForJWT",
                "bedrock-agentcore:GetWorkloadAccessTokenForUserId"
            ],
            "Resource": [
                "arn:aws:bedrock-agentcore:us-east-1:123456789012:workload-identity-directory/default",
                "arn:aws:bedrock-agentcore:us-east-1:123456789012:workload-identity-directory/default/workload-identity/rust_agent-*"
            ]
        })
    );
}

#[test]
fn test_runtime_trust_wire_shape() {
    let trust = runtime_trust(&ctx()).unwrap();
    assert_eq!(
        serde_json::to_value(&trust).unwrap(),
        serde_json::json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": { "Service": "bedrock-agentcore.amazonaws.com" },
                "Action": ["sts:AssumeRole"],
                "Condition": {
                    "StringEquals": { "aws:SourceAccount": "123456789012" },
                    "ArnLike": {
                        "aws:SourceArn": "arn:aws:bedrock-agentcore:us-east-1:123456789012:*"
                    }
                }
            }]
        })
    );
}
