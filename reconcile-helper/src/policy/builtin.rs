use std::sync::LazyLock;
use std::time::Duration;

use k8s_openapi::api::core::v1::{
    ConfigMap, Namespace, PersistentVolumeClaim, Secret, Service, ServiceAccount, ServicePort,
};

use super::{Owned, annotations, labels};
use crate::merge::{Ownership, Rule, Visibility};

const SERVICE_TYPE_LOAD_BALANCER: &str = "LoadBalancer";
const SECRET_TYPE_SERVICE_ACCOUNT_TOKEN: &str = "kubernetes.io/service-account-token";
/// Set by the volume binder once a claim is bound.
const BIND_COMPLETED_ANNOTATION: &str = "pv.kubernetes.io/bind-completed";

const NAMESPACE_VISIBILITY: Visibility = Visibility::Poll {
    attempts: 5,
    interval: Duration::from_secs(3),
};

fn first_port(svc: &Service) -> Option<&ServicePort> {
    svc.spec.as_ref()?.ports.as_ref()?.first()
}

fn first_port_mut(svc: &mut Service) -> Option<&mut ServicePort> {
    svc.spec.as_mut()?.ports.as_mut()?.first_mut()
}

fn load_balancer_with_ports(desired: &Service, observed: &Service) -> bool {
    let is_load_balancer = observed
        .spec
        .as_ref()
        .and_then(|s| s.type_.as_deref())
        == Some(SERVICE_TYPE_LOAD_BALANCER);
    is_load_balancer && first_port(desired).is_some() && first_port(observed).is_some()
}

impl Owned for Service {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<Service>> = LazyLock::new(|| {
            type R = Rule<Service>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value(
                    "selector",
                    |o| o.spec.as_ref()?.selector.as_ref(),
                    |o, v| o.spec.get_or_insert_with(Default::default).selector = v,
                ),
                R::value(
                    "type",
                    |o| o.spec.as_ref()?.type_.as_ref(),
                    |o, v| o.spec.get_or_insert_with(Default::default).type_ = v,
                ),
                // The cloud provider fills in node ports on load balancers, so
                // only the first port is reconciled there.
                R::when(
                    load_balancer_with_ports,
                    vec![
                        R::value(
                            "port app protocol",
                            |o| first_port(o)?.app_protocol.as_ref(),
                            |o, v| {
                                if let Some(p) = first_port_mut(o) {
                                    p.app_protocol = v
                                }
                            },
                        ),
                        R::value(
                            "port name",
                            |o| first_port(o)?.name.as_ref(),
                            |o, v| {
                                if let Some(p) = first_port_mut(o) {
                                    p.name = v
                                }
                            },
                        ),
                        R::value(
                            "port number",
                            |o| first_port(o).map(|p| &p.port),
                            |o, v| {
                                if let (Some(p), Some(v)) = (first_port_mut(o), v) {
                                    p.port = v
                                }
                            },
                        ),
                        R::compare("port protocol", |o| first_port(o)?.protocol.as_ref()),
                        R::value(
                            "port target",
                            |o| first_port(o)?.target_port.as_ref(),
                            |o, v| {
                                if let Some(p) = first_port_mut(o) {
                                    p.target_port = v
                                }
                            },
                        ),
                    ],
                    vec![R::value(
                        "ports",
                        |o| o.spec.as_ref()?.ports.as_ref(),
                        |o, v| o.spec.get_or_insert_with(Default::default).ports = v,
                    )],
                ),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for Secret {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<Secret>> = LazyLock::new(|| {
            type R = Rule<Secret>;
            Ownership::new(vec![
                labels(),
                annotations(),
                // token payloads are written by the token controller
                R::when(
                    |_, observed| observed.type_.as_deref() != Some(SECRET_TYPE_SERVICE_ACCOUNT_TOKEN),
                    vec![R::value("data", |o| o.data.as_ref(), |o, v| o.data = v)],
                    vec![],
                ),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for ConfigMap {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<ConfigMap>> = LazyLock::new(|| {
            type R = Rule<ConfigMap>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value("data", |o| o.data.as_ref(), |o, v| o.data = v),
                R::value(
                    "binary data",
                    |o| o.binary_data.as_ref(),
                    |o, v| o.binary_data = v,
                ),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for PersistentVolumeClaim {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<PersistentVolumeClaim>> = LazyLock::new(|| {
            type R = Rule<PersistentVolumeClaim>;
            Ownership::new(vec![
                labels(),
                R::map_ignoring(
                    "annotation",
                    &[BIND_COMPLETED_ANNOTATION],
                    |o| o.metadata.annotations.as_ref(),
                    |o, v| o.metadata.annotations = v,
                ),
                R::value(
                    "storage requests",
                    |o| o.spec.as_ref()?.resources.as_ref()?.requests.as_ref(),
                    |o, v| {
                        o.spec
                            .get_or_insert_with(Default::default)
                            .resources
                            .get_or_insert_with(Default::default)
                            .requests = v
                    },
                ),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for ServiceAccount {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<ServiceAccount>> = LazyLock::new(|| {
            type R = Rule<ServiceAccount>;
            Ownership::new(vec![
                labels(),
                annotations(),
                R::value(
                    "image pull secrets",
                    |o| o.image_pull_secrets.as_ref(),
                    |o, v| o.image_pull_secrets = v,
                ),
                R::value(
                    "automount service account token",
                    |o| o.automount_service_account_token.as_ref(),
                    |o, v| o.automount_service_account_token = v,
                ),
            ])
        });
        &OWNERSHIP
    }
}

impl Owned for Namespace {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<Namespace>> = LazyLock::new(|| {
            Ownership::new(vec![labels(), annotations()]).with_visibility(NAMESPACE_VISIBILITY)
        });
        &OWNERSHIP
    }
}
