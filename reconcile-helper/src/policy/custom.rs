use std::sync::LazyLock;

use reconcile_helper_crds::hnc::SubnamespaceAnchor;
use reconcile_helper_crds::kubeflow::{Environment, PodDefault};
use reconcile_helper_crds::postgres::Postgresql;
use reconcile_helper_crds::{ack, crossplane};

use super::{Owned, annotations, labels, owns_metadata_and_spec};
use crate::merge::{Ownership, Rule};

owns_metadata_and_spec!(
    Postgresql,
    Environment,
    PodDefault,
    crossplane::Policy,
    crossplane::Role,
    crossplane::User,
    crossplane::RolePolicyAttachment,
    crossplane::UserPolicyAttachment,
    ack::Policy,
    ack::Role,
);

// The anchor spec is filled in by the HNC webhook.
impl Owned for SubnamespaceAnchor {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<SubnamespaceAnchor>> =
            LazyLock::new(|| Ownership::new(vec![labels(), annotations()]));
        &OWNERSHIP
    }
}

impl Owned for crossplane::AccessKey {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<crossplane::AccessKey>> = LazyLock::new(|| {
            type R = Rule<crossplane::AccessKey>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value(
                    "deletion policy",
                    |o| o.spec.deletion_policy.as_ref(),
                    |o, v| o.spec.deletion_policy = v,
                ),
                R::value(
                    "for provider",
                    |o| Some(&o.spec.for_provider),
                    |o, v| o.spec.for_provider = v.unwrap_or_default(),
                ),
                R::value(
                    "provider config ref",
                    |o| o.spec.provider_config_ref.as_ref(),
                    |o, v| o.spec.provider_config_ref = v,
                ),
            ])
        });
        &OWNERSHIP
    }
}

#[cfg(test)]
mod tests {
    use kube::api::ObjectMeta;
    use reconcile_helper_crds::crossplane::{AccessKeySpec, Reference, SecretReference};
    use reconcile_helper_crds::hnc::{MetaKvp, SubnamespaceAnchorSpec};
    use reconcile_helper_crds::postgres::PostgresqlSpec;
    use serde_json::json;

    use super::*;
    use crate::merge::merge;

    fn make_meta(name: &str, namespace: Option<&str>) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.into()),
            namespace: namespace.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_access_key_connection_secret_not_owned() {
        let desired = crossplane::AccessKey {
            metadata: make_meta("ci-bot", None),
            spec: AccessKeySpec {
                for_provider: json!({ "userName": "ci-bot" }),
                provider_config_ref: Some(Reference {
                    name: "aws".into(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        };
        let mut observed = crossplane::AccessKey {
            metadata: make_meta("ci-bot", None),
            spec: AccessKeySpec {
                deletion_policy: Some("Delete".into()),
                for_provider: json!({ "userName": "old-bot" }),
                provider_config_ref: Some(Reference {
                    name: "aws".into(),
                    ..Default::default()
                }),
                write_connection_secret_to_ref: Some(SecretReference {
                    name: "ci-bot-key".into(),
                    namespace: "ci".into(),
                }),
                ..Default::default()
            },
        };

        assert!(merge(crossplane::AccessKey::ownership(), &desired, &mut observed));
        assert_eq!(observed.spec.for_provider, desired.spec.for_provider);
        assert_eq!(observed.spec.deletion_policy, None);
        assert!(observed.spec.write_connection_secret_to_ref.is_some());
    }

    #[test]
    fn test_anchor_spec_not_owned() {
        let desired = SubnamespaceAnchor {
            metadata: make_meta("team-a-dev", Some("team-a")),
            spec: SubnamespaceAnchorSpec::default(),
        };
        let mut observed = SubnamespaceAnchor {
            metadata: make_meta("team-a-dev", Some("team-a")),
            spec: SubnamespaceAnchorSpec {
                labels: vec![MetaKvp {
                    key: "team".into(),
                    value: "a".into(),
                }],
                ..Default::default()
            },
        };

        assert!(!merge(SubnamespaceAnchor::ownership(), &desired, &mut observed));
        assert_eq!(observed.spec.labels.len(), 1);
    }

    #[test]
    fn test_postgresql_spec() {
        let make = |instances| Postgresql {
            metadata: make_meta("orders", Some("data")),
            spec: PostgresqlSpec {
                team_id: "data".into(),
                number_of_instances: instances,
                ..Default::default()
            },
        };
        let desired = make(3);
        let mut observed = make(1);

        assert!(merge(Postgresql::ownership(), &desired, &mut observed));
        assert_eq!(observed.spec.number_of_instances, 3);
    }
}
