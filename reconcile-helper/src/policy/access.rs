use std::sync::LazyLock;

use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::RoleBinding;

use super::{Owned, annotations, labels};
use crate::merge::{Ownership, Rule};

impl Owned for RoleBinding {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<RoleBinding>> = LazyLock::new(|| {
            type R = Rule<RoleBinding>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value(
                    "role ref",
                    |o| Some(&o.role_ref),
                    |o, v| {
                        if let Some(v) = v {
                            o.role_ref = v
                        }
                    },
                ),
                R::value("subjects", |o| o.subjects.as_ref(), |o, v| o.subjects = v),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for NetworkPolicy {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<NetworkPolicy>> = LazyLock::new(|| {
            type R = Rule<NetworkPolicy>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value("spec", |o| o.spec.as_ref(), |o, v| o.spec = v),
            ])
        });
        &OWNERSHIP
    }
}
