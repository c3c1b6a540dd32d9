use std::sync::LazyLock;

use k8s_openapi::api::apps::v1::{Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};

use super::{Owned, annotations, labels};
use crate::merge::{ContainerMode, Ownership, Rule};

trait PodTemplated: 'static {
    fn template(&self) -> Option<&PodTemplateSpec>;
    fn template_mut(&mut self) -> &mut PodTemplateSpec;
}

impl PodTemplated for Deployment {
    fn template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }

    fn template_mut(&mut self) -> &mut PodTemplateSpec {
        &mut self.spec.get_or_insert_with(Default::default).template
    }
}

impl PodTemplated for StatefulSet {
    fn template(&self) -> Option<&PodTemplateSpec> {
        self.spec.as_ref().map(|s| &s.template)
    }

    fn template_mut(&mut self) -> &mut PodTemplateSpec {
        &mut self.spec.get_or_insert_with(Default::default).template
    }
}

fn pod<K: PodTemplated>(o: &K) -> Option<&PodSpec> {
    o.template()?.spec.as_ref()
}

fn pod_mut<K: PodTemplated>(o: &mut K) -> &mut PodSpec {
    o.template_mut().spec.get_or_insert_with(Default::default)
}

fn template_labels<K: PodTemplated>() -> Rule<K> {
    Rule::map(
        "template label",
        |o: &K| o.template()?.metadata.as_ref()?.labels.as_ref(),
        |o: &mut K, v| o.template_mut().metadata.get_or_insert_with(Default::default).labels = v,
    )
}

fn template_annotations<K: PodTemplated>() -> Rule<K> {
    Rule::map(
        "template annotation",
        |o: &K| o.template()?.metadata.as_ref()?.annotations.as_ref(),
        |o: &mut K, v| {
            o.template_mut()
                .metadata
                .get_or_insert_with(Default::default)
                .annotations = v
        },
    )
}

/// Pod spec fields owned on both workload kinds.
fn pod_rules<K: PodTemplated>() -> Vec<Rule<K>> {
    vec![
        Rule::value(
            "volumes",
            |o: &K| pod(o)?.volumes.as_ref(),
            |o: &mut K, v| pod_mut(o).volumes = v,
        ),
        Rule::value(
            "service account name",
            |o: &K| pod(o)?.service_account_name.as_ref(),
            |o: &mut K, v| pod_mut(o).service_account_name = v,
        ),
        Rule::value(
            "security context",
            |o: &K| pod(o)?.security_context.as_ref(),
            |o: &mut K, v| pod_mut(o).security_context = v,
        ),
        Rule::value(
            "affinity",
            |o: &K| pod(o)?.affinity.as_ref(),
            |o: &mut K, v| pod_mut(o).affinity = v,
        ),
        Rule::value(
            "tolerations",
            |o: &K| pod(o)?.tolerations.as_ref(),
            |o: &mut K, v| pod_mut(o).tolerations = v,
        ),
    ]
}

fn containers<K: PodTemplated>(mode: ContainerMode) -> Rule<K> {
    Rule::containers(
        mode,
        |o: &K| pod(o).map(|p| &p.containers),
        |o: &mut K| &mut pod_mut(o).containers,
    )
}

// Deployment annotations are left to the deployment controller.
impl Owned for Deployment {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<Deployment>> = LazyLock::new(|| {
            type R = Rule<Deployment>;
            let mut rules = vec![
                labels(),
                R::value(
                    "replicas",
                    |o| o.spec.as_ref()?.replicas.as_ref(),
                    |o, v| o.spec.get_or_insert_with(Default::default).replicas = v,
                ),
                template_labels(),
                template_annotations(),
            ];
            rules.extend(pod_rules());
            rules.push(R::value(
                "topology spread constraints",
                |o| pod(o)?.topology_spread_constraints.as_ref(),
                |o, v| pod_mut(o).topology_spread_constraints = v,
            ));
            rules.push(containers(ContainerMode::ByPosition));
            Ownership::new(rules)
        });
        &OWNERSHIP
    }
}

impl Owned for StatefulSet {
    fn ownership() -> &'static Ownership<Self> {
        static OWNERSHIP: LazyLock<Ownership<StatefulSet>> = LazyLock::new(|| {
            type R = Rule<StatefulSet>;
            let mut rules = vec![
                labels(),
                annotations(),
                R::value(
                    "replicas",
                    |o| o.spec.as_ref()?.replicas.as_ref(),
                    |o, v| o.spec.get_or_insert_with(Default::default).replicas = v,
                ),
                template_labels(),
                template_annotations(),
            ];
            rules.extend(pod_rules());
            rules.push(containers(ContainerMode::FirstOnly));
            Ownership::new(rules)
        });
        &OWNERSHIP
    }
}
