use std::sync::LazyLock;

use reconcile_helper_crds::istio::{
    AuthorizationPolicy, DestinationRule, EnvoyFilter, PeerAuthentication, RequestAuthentication,
    VirtualService,
};

use super::{Owned, annotations, labels, owns_metadata_and_spec};
use crate::merge::{Ownership, Rule};

owns_metadata_and_spec!(VirtualService, DestinationRule, PeerAuthentication, EnvoyFilter);

impl Owned for AuthorizationPolicy {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<AuthorizationPolicy>> = LazyLock::new(|| {
            type R = Rule<AuthorizationPolicy>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value(
                    "selector",
                    |o| o.spec.selector.as_ref(),
                    |o, v| o.spec.selector = v,
                ),
                R::value("action", |o| o.spec.action.as_ref(), |o, v| o.spec.action = v),
                R::value(
                    "rules",
                    |o| Some(&o.spec.rules),
                    |o, v| o.spec.rules = v.unwrap_or_default(),
                ),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for RequestAuthentication {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<RequestAuthentication>> = LazyLock::new(|| {
            type R = Rule<RequestAuthentication>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value(
                    "selector",
                    |o| o.spec.selector.as_ref(),
                    |o, v| o.spec.selector = v,
                ),
                R::value(
                    "jwt rules",
                    |o| Some(&o.spec.jwt_rules),
                    |o, v| o.spec.jwt_rules = v.unwrap_or_default(),
                ),
            ])
        });
        &OWNERSHIP
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use kube::api::ObjectMeta;
    use reconcile_helper_crds::istio::{AuthorizationPolicySpec, VirtualServiceSpec};
    use serde_json::json;

    use super::*;
    use crate::merge::merge;

    #[test]
    fn test_authorization_policy_keeps_unowned_spec_fields() {
        let meta = ObjectMeta {
            name: Some("allow-ingress".into()),
            namespace: Some("apps".into()),
            ..Default::default()
        };
        let desired = AuthorizationPolicy {
            metadata: meta.clone(),
            spec: AuthorizationPolicySpec {
                action: Some("ALLOW".into()),
                rules: vec![json!({ "from": [{ "source": { "namespaces": ["ingress"] } }] })],
                ..Default::default()
            },
        };
        let mut observed = AuthorizationPolicy {
            metadata: meta,
            spec: AuthorizationPolicySpec {
                action: Some("DENY".into()),
                extra: BTreeMap::from([("provider".to_string(), json!({ "name": "opa" }))]),
                ..Default::default()
            },
        };

        assert!(merge(AuthorizationPolicy::ownership(), &desired, &mut observed));
        assert_eq!(observed.spec.action.as_deref(), Some("ALLOW"));
        assert_eq!(observed.spec.rules, desired.spec.rules);
        assert!(observed.spec.extra.contains_key("provider"));
    }

    #[test]
    fn test_virtual_service_spec_replaced() {
        let make = |hosts: &[&str]| VirtualService {
            metadata: ObjectMeta {
                name: Some("web".into()),
                namespace: Some("apps".into()),
                ..Default::default()
            },
            spec: VirtualServiceSpec {
                hosts: hosts.iter().map(|h| h.to_string()).collect(),
                ..Default::default()
            },
        };
        let desired = make(&["web.example.com"]);
        let mut observed = make(&["web.example.org"]);

        assert!(merge(VirtualService::ownership(), &desired, &mut observed));
        assert_eq!(observed, desired);
    }
}
