//! Entry points for every kind in the catalog, plus [`Manifest`], the same
//! catalog as a single enum.

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, PersistentVolumeClaim, Secret, Service, ServiceAccount,
};
use k8s_openapi::api::networking::v1::NetworkPolicy;
use k8s_openapi::api::rbac::v1::RoleBinding;
use kube::api::ObjectMeta;
use kube::{Client, Resource};
use reconcile_helper_crds::hnc::SubnamespaceAnchor;
use reconcile_helper_crds::istio::{
    AuthorizationPolicy, DestinationRule, EnvoyFilter, PeerAuthentication, RequestAuthentication,
    VirtualService,
};
use reconcile_helper_crds::kubeflow::{Environment, PodDefault};
use reconcile_helper_crds::postgres::Postgresql;
use reconcile_helper_crds::{ack, crossplane};
use tracing::Span;

use crate::reconcile::{self, Outcome, Plan, ensure};
use crate::store::{ApiScope, ObjectStore};
use crate::{Error, Result};

macro_rules! catalog {
    ($($(#[$doc:meta])* $name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            $(#[$doc])*
            pub async fn $name<S>(store: &S, desired: &$ty, span: &Span) -> Result<Outcome>
            where
                S: ObjectStore<$ty> + Sync,
            {
                ensure(store, desired, span).await
            }
        )*

        /// An object of any kind in the catalog.
        #[derive(Clone, Debug, PartialEq)]
        pub enum Manifest {
            $($variant($ty)),*
        }

        impl Manifest {
            /// Decodes a single object, picking the type from its `apiVersion`
            /// and `kind`.
            pub fn from_value(value: serde_yaml::Value) -> Result<Self> {
                let field = |name: &str| {
                    value
                        .get(name)
                        .and_then(serde_yaml::Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let api_version = field("apiVersion");
                let kind = field("kind");
                $(
                    if api_version == <$ty as Resource>::api_version(&())
                        && kind == <$ty as Resource>::kind(&())
                    {
                        return Ok(Manifest::$variant(serde_yaml::from_value(value)?));
                    }
                )*
                Err(Error::UnsupportedKind { api_version, kind })
            }

            pub fn kind(&self) -> String {
                match self {
                    $(Manifest::$variant(_) => <$ty as Resource>::kind(&()).into_owned(),)*
                }
            }

            pub fn meta(&self) -> &ObjectMeta {
                match self {
                    $(Manifest::$variant(obj) => obj.meta(),)*
                }
            }

            pub fn meta_mut(&mut self) -> &mut ObjectMeta {
                match self {
                    $(Manifest::$variant(obj) => obj.meta_mut(),)*
                }
            }

            pub fn is_namespaced(&self) -> bool {
                match self {
                    $(Manifest::$variant(_) => {
                        <<$ty as Resource>::Scope as ApiScope>::NAMESPACED
                    })*
                }
            }

            pub async fn ensure(&self, client: &Client, span: &Span) -> Result<Outcome> {
                match self {
                    $(Manifest::$variant(obj) => $name(client, obj, span).await,)*
                }
            }

            pub async fn plan(&self, client: &Client, span: &Span) -> Result<Plan<Manifest>> {
                match self {
                    $(Manifest::$variant(obj) => {
                        Ok(reconcile::plan(client, obj, span).await?.map(Manifest::$variant))
                    })*
                }
            }
        }
    };
}

catalog! {
    /// Replicas, the pod template metadata, scheduling fields and containers
    /// matched by position are owned. Object annotations are not.
    deployment => Deployment(Deployment),
    /// Like [`deployment`], but only the first container is reconciled.
    stateful_set => StatefulSet(StatefulSet),
    /// Cluster IPs are never touched. Load balancers only get their first
    /// port reconciled.
    service => Service(Service),
    /// Data of service account token secrets is left alone.
    secret => Secret(Secret),
    config_map => ConfigMap(ConfigMap),
    persistent_volume_claim => PersistentVolumeClaim(PersistentVolumeClaim),
    service_account => ServiceAccount(ServiceAccount),
    role_binding => RoleBinding(RoleBinding),
    network_policy => NetworkPolicy(NetworkPolicy),
    /// Waits for a newly created namespace to become readable.
    namespace => Namespace(Namespace),
    virtual_service => VirtualService(VirtualService),
    destination_rule => DestinationRule(DestinationRule),
    envoy_filter => EnvoyFilter(EnvoyFilter),
    authorization_policy => AuthorizationPolicy(AuthorizationPolicy),
    request_authentication => RequestAuthentication(RequestAuthentication),
    peer_authentication => PeerAuthentication(PeerAuthentication),
    postgresql => Postgresql(Postgresql),
    kubeflow_environment => KubeflowEnvironment(Environment),
    pod_default => PodDefault(PodDefault),
    subnamespace_anchor => SubnamespaceAnchor(SubnamespaceAnchor),
    crossplane_policy => CrossplanePolicy(crossplane::Policy),
    crossplane_role => CrossplaneRole(crossplane::Role),
    crossplane_user => CrossplaneUser(crossplane::User),
    crossplane_role_policy_attachment => CrossplaneRolePolicyAttachment(crossplane::RolePolicyAttachment),
    crossplane_user_policy_attachment => CrossplaneUserPolicyAttachment(crossplane::UserPolicyAttachment),
    crossplane_access_key => CrossplaneAccessKey(crossplane::AccessKey),
    ack_policy => AckPolicy(ack::Policy),
    ack_role => AckRole(ack::Role),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingStore;

    #[tokio::test]
    async fn test_entry_point_uses_kind_ownership() {
        let store = RecordingStore::<ConfigMap>::default();
        let desired = ConfigMap {
            metadata: ObjectMeta {
                name: Some("settings".into()),
                namespace: Some("apps".into()),
                ..Default::default()
            },
            data: Some([("mode".to_string(), "fast".to_string())].into()),
            ..Default::default()
        };

        let outcome = config_map(&store, &desired, &Span::none()).await.expect("create");
        assert_eq!(outcome, Outcome::Created);
        let outcome = config_map(&store, &desired, &Span::none()).await.expect("noop");
        assert_eq!(outcome, Outcome::Unchanged);
    }
}
