//! Crossplane `provider-aws` IAM resources. All of them are cluster-scoped.
//!
//! `forProvider` differs per kind and is kept as raw JSON; the fields shared by
//! every managed resource are typed.

use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Extra;

#[derive(Serialize, Deserialize, Default, PartialEq, Eq, Clone, Debug)]
pub struct Reference {
    pub name: String,
    /// Resolution policy and anything newer providers add.
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Serialize, Deserialize, Default, PartialEq, Eq, Clone, Debug)]
pub struct SecretReference {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

macro_rules! managed_resource {
    ($(#[$doc:meta])* $spec:ident, $kind:tt) => {
        $(#[$doc])*
        #[derive(CustomResource, Serialize, Deserialize, Default, PartialEq, Clone, Debug)]
        #[kube(
            group = "iam.aws.crossplane.io",
            version = "v1beta1",
            kind = $kind,
            schema = "disabled",
            derive = "Default",
            derive = "PartialEq"
        )]
        #[serde(rename_all = "camelCase")]
        pub struct $spec {
            /// `Delete` or `Orphan`.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub deletion_policy: Option<String>,
            #[serde(default, skip_serializing_if = "Value::is_null")]
            pub for_provider: Value,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub provider_config_ref: Option<Reference>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub write_connection_secret_to_ref: Option<SecretReference>,
            #[serde(flatten)]
            pub extra: Extra,
        }
    };
}

managed_resource!(PolicySpec, "Policy");
managed_resource!(RoleSpec, "Role");
managed_resource!(UserSpec, "User");
managed_resource!(RolePolicyAttachmentSpec, "RolePolicyAttachment");
managed_resource!(UserPolicyAttachmentSpec, "UserPolicyAttachment");
managed_resource!(
    /// Access key for an IAM user. The secret key is published through
    /// `writeConnectionSecretToRef`.
    AccessKeySpec,
    "AccessKey"
);

#[cfg(test)]
mod tests {
    use kube::Resource;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cluster_scoped_access_key() {
        let key: AccessKey = serde_json::from_value(json!({
            "apiVersion": "iam.aws.crossplane.io/v1beta1",
            "kind": "AccessKey",
            "metadata": { "name": "ci-bot" },
            "spec": {
                "forProvider": { "userName": "ci-bot" },
                "providerConfigRef": { "name": "aws" },
                "writeConnectionSecretToRef": { "name": "ci-bot-key", "namespace": "ci" }
            }
        }))
        .expect("decode");

        assert_eq!(AccessKey::api_version(&()), "iam.aws.crossplane.io/v1beta1");
        assert_eq!(key.spec.for_provider["userName"], "ci-bot");
        assert_eq!(
            key.spec.provider_config_ref,
            Some(Reference {
                name: "aws".into(),
                ..Default::default()
            })
        );
        assert!(key.spec.deletion_policy.is_none());
    }

    #[test]
    fn test_reference_policy_survives_round_trip() {
        let spec = json!({
            "forProvider": { "name": "read-only" },
            "providerConfigRef": {
                "name": "aws",
                "policy": { "resolution": "Required", "resolve": "Always" }
            }
        });
        let decoded: PolicySpec = serde_json::from_value(spec.clone()).expect("decode");
        let reference = decoded.provider_config_ref.as_ref().expect("reference");
        assert_eq!(reference.extra["policy"]["resolve"], "Always");

        let encoded = serde_json::to_value(&decoded).expect("encode");
        assert_eq!(encoded, spec);
    }
}
