use k8s_openapi::api::core::v1::{
    EnvFromSource, EnvVar, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use crate::Extra;

/// Injects pod settings into every pod matching the selector.
#[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Clone, Debug)]
#[kube(
    group = "kubeflow.org",
    version = "v1alpha1",
    kind = "PodDefault",
    schema = "disabled",
    derive = "Default",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct PodDefaultSpec {
    #[serde(default)]
    pub selector: LabelSelector,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_from: Vec<EnvFromSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Platform environment managed by the kubeflow-controller. The spec is passed
/// through as-is.
#[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Clone, Debug)]
#[kube(
    group = "platform.kubeflow.org",
    version = "v1alpha1",
    kind = "Environment",
    schema = "disabled",
    derive = "Default",
    derive = "PartialEq"
)]
pub struct EnvironmentSpec {
    #[serde(flatten)]
    pub fields: Extra,
}
