use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::Extra;

/// IAM policy managed by the AWS Controllers for Kubernetes IAM controller.
#[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Clone, Debug)]
#[kube(
    group = "iam.services.k8s.aws",
    version = "v1alpha1",
    kind = "Policy",
    schema = "disabled",
    derive = "Default",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy_document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// IAM role managed by the AWS Controllers for Kubernetes IAM controller.
#[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Clone, Debug)]
#[kube(
    group = "iam.services.k8s.aws",
    version = "v1alpha1",
    kind = "Role",
    schema = "disabled",
    derive = "Default",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_policy_document: Option<String>,
    /// ARNs of the managed policies attached to the role.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
