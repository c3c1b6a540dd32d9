use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Requests a subnamespace of the anchor's namespace from the hierarchical
/// namespace controller.
#[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Eq, Clone, Debug)]
#[kube(
    group = "hnc.x-k8s.io",
    version = "v1alpha2",
    kind = "SubnamespaceAnchor",
    plural = "subnamespaceanchors",
    schema = "disabled",
    derive = "Default",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SubnamespaceAnchorSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<MetaKvp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<MetaKvp>,
}

/// Label or annotation propagated to the subnamespace.
#[derive(Serialize, Deserialize, Default, PartialEq, Eq, Clone, Debug)]
pub struct MetaKvp {
    pub key: String,
    pub value: String,
}
