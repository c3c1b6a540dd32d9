//! Field-level diff and merge of a desired object into an observed one.
//!
//! A kind's [`Ownership`] lists the fields the helpers own, in the order they
//! are compared. [`merge`] walks that list, reports every difference it finds
//! and overwrites each owned field of the observed object with the desired
//! value. Fields that are not listed are never read or written.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::LazyLock;
use std::time::Duration;

use k8s_openapi::api::core::v1::Container;
use kube::Resource;
use tracing::{debug, trace};

pub type StringMap = BTreeMap<String, String>;

/// What the orchestrator waits for after creating an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// The object is readable as soon as the create call returns.
    Immediate,
    /// Re-fetch the object until it shows up. The first fetch happens right
    /// after creation, later ones `interval` apart.
    Poll { attempts: u32, interval: Duration },
}

pub struct Ownership<K> {
    pub rules: Vec<Rule<K>>,
    pub visibility: Visibility,
}

impl<K> Ownership<K> {
    pub fn new(rules: Vec<Rule<K>>) -> Self {
        Self {
            rules,
            visibility: Visibility::Immediate,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

pub enum Rule<K> {
    /// Label or annotation style map, compared key by key.
    Map(MapField<K>),
    /// Any other field, compared with `PartialEq`.
    Value(Box<dyn ValueRule<K>>),
    /// Pod template containers.
    Containers(ContainerList<K>),
    /// Applies `then` when the guard holds for (desired, observed), otherwise
    /// `otherwise`. The guard sees the observed object as mutated by the rules
    /// before it.
    When {
        guard: fn(&K, &K) -> bool,
        then: Vec<Rule<K>>,
        otherwise: Vec<Rule<K>>,
    },
}

impl<K: 'static> Rule<K> {
    pub fn value<T>(
        name: &'static str,
        read: fn(&K) -> Option<&T>,
        write: fn(&mut K, Option<T>),
    ) -> Self
    where
        T: PartialEq + Clone + Debug + 'static,
    {
        Rule::Value(Box::new(Field {
            name,
            read,
            write: Some(write),
        }))
    }

    /// A field that takes part in change detection but is never copied.
    pub fn compare<T>(name: &'static str, read: fn(&K) -> Option<&T>) -> Self
    where
        T: PartialEq + Clone + Debug + 'static,
    {
        Rule::Value(Box::new(Field {
            name,
            read,
            write: None,
        }))
    }

    pub fn map(
        name: &'static str,
        read: fn(&K) -> Option<&StringMap>,
        write: fn(&mut K, Option<StringMap>),
    ) -> Self {
        Rule::Map(MapField {
            name,
            ignored: &[],
            read,
            write,
        })
    }

    /// Like [`Rule::map`], but a difference on one of the `ignored` keys never
    /// counts as a change. The keys are still overwritten.
    pub fn map_ignoring(
        name: &'static str,
        ignored: &'static [&'static str],
        read: fn(&K) -> Option<&StringMap>,
        write: fn(&mut K, Option<StringMap>),
    ) -> Self {
        Rule::Map(MapField {
            name,
            ignored,
            read,
            write,
        })
    }

    pub fn containers(
        mode: ContainerMode,
        read: fn(&K) -> Option<&Vec<Container>>,
        write: fn(&mut K) -> &mut Vec<Container>,
    ) -> Self {
        Rule::Containers(ContainerList { mode, read, write })
    }

    pub fn when(guard: fn(&K, &K) -> bool, then: Vec<Rule<K>>, otherwise: Vec<Rule<K>>) -> Self {
        Rule::When {
            guard,
            then,
            otherwise,
        }
    }

    fn apply(&self, cx: &Context<'_>, desired: &K, observed: &mut K) -> bool {
        match self {
            Rule::Map(field) => field.apply(cx, desired, observed),
            Rule::Value(field) => field.apply(cx, desired, observed),
            Rule::Containers(list) => list.apply(cx, desired, observed),
            Rule::When {
                guard,
                then,
                otherwise,
            } => {
                if guard(desired, observed) {
                    apply_rules(then, cx, desired, observed)
                } else {
                    apply_rules(otherwise, cx, desired, observed)
                }
            }
        }
    }
}

/// Where a difference was found, for the diff log lines.
pub struct Context<'a> {
    kind: &'a str,
    prefix: &'a str,
}

impl Context<'_> {
    fn report<W, E>(&self, field: &str, wanted: &W, existing: &E)
    where
        W: Debug + ?Sized,
        E: Debug + ?Sized,
    {
        debug!(
            "reconciling {} due to {}{} change",
            self.kind, self.prefix, field
        );
        trace!(
            ?wanted,
            ?existing,
            "difference in {} {}{}",
            self.kind,
            self.prefix,
            field
        );
    }
}

pub trait ValueRule<K>: Send + Sync {
    fn apply(&self, cx: &Context<'_>, desired: &K, observed: &mut K) -> bool;
}

struct Field<K, T> {
    name: &'static str,
    read: fn(&K) -> Option<&T>,
    write: Option<fn(&mut K, Option<T>)>,
}

impl<K, T> ValueRule<K> for Field<K, T>
where
    T: PartialEq + Clone + Debug,
{
    fn apply(&self, cx: &Context<'_>, desired: &K, observed: &mut K) -> bool {
        let wanted = (self.read)(desired);
        let existing = (self.read)(observed);
        let changed = wanted != existing;
        if changed {
            cx.report(self.name, &wanted, &existing);
        }

        // absent on both sides: leave the observed parents alone
        let touched = wanted.is_some() || existing.is_some();
        if let Some(write) = self.write
            && touched
        {
            write(observed, wanted.cloned());
        }
        changed
    }
}

pub struct MapField<K> {
    name: &'static str,
    ignored: &'static [&'static str],
    read: fn(&K) -> Option<&StringMap>,
    write: fn(&mut K, Option<StringMap>),
}

impl<K> MapField<K> {
    /// Only keys already present on the observed side are inspected, and a key
    /// missing from the desired map reads as "". A key added to a non-empty
    /// map is therefore not reported. The desired map replaces the observed
    /// one either way.
    fn apply(&self, cx: &Context<'_>, desired: &K, observed: &mut K) -> bool {
        let empty = StringMap::new();
        let wanted = (self.read)(desired);
        let existing = (self.read)(observed);
        let wanted_map = wanted.unwrap_or(&empty);
        let existing_map = existing.unwrap_or(&empty);

        let drifted = existing_map
            .iter()
            .filter(|(key, _)| !self.ignored.contains(&key.as_str()))
            .any(|(key, value)| wanted_map.get(key).map_or("", String::as_str) != value.as_str());
        let changed = drifted || (existing_map.is_empty() && !wanted_map.is_empty());
        if changed {
            cx.report(self.name, wanted_map, existing_map);
        }

        let touched = wanted.is_some() || existing.is_some();
        if touched {
            (self.write)(observed, wanted.cloned());
        }
        changed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerMode {
    /// Only the first container is reconciled field by field. When either
    /// side has no containers the whole list is replaced.
    FirstOnly,
    /// Containers are matched by index. Observed containers past the end of
    /// the desired list are kept, desired ones past the end of the observed
    /// list are appended.
    ByPosition,
}

pub struct ContainerList<K> {
    mode: ContainerMode,
    read: fn(&K) -> Option<&Vec<Container>>,
    write: fn(&mut K) -> &mut Vec<Container>,
}

impl<K> ContainerList<K> {
    fn apply(&self, cx: &Context<'_>, desired: &K, observed: &mut K) -> bool {
        let wanted: &[Container] = (self.read)(desired).map(Vec::as_slice).unwrap_or_default();
        let existing: &[Container] = (self.read)(observed).map(Vec::as_slice).unwrap_or_default();

        match self.mode {
            ContainerMode::FirstOnly if wanted.is_empty() || existing.is_empty() => {
                if wanted == existing {
                    return false;
                }
                cx.report("containers", wanted, existing);
                *(self.write)(observed) = wanted.to_vec();
                true
            }
            ContainerMode::FirstOnly => {
                apply_container(cx, 0, &wanted[0], &mut (self.write)(observed)[0])
            }
            ContainerMode::ByPosition => {
                if wanted.is_empty() {
                    return false;
                }
                let containers = (self.write)(observed);
                let mut changed = false;
                for (index, container) in wanted.iter().enumerate() {
                    match containers.get_mut(index) {
                        Some(current) => changed |= apply_container(cx, index, container, current),
                        None => {
                            cx.report(&format!("container[{index}]"), container, &None::<Container>);
                            containers.push(container.clone());
                            changed = true;
                        }
                    }
                }
                changed
            }
        }
    }
}

static CONTAINER_RULES: LazyLock<Vec<Rule<Container>>> = LazyLock::new(|| {
    type R = Rule<Container>;
    vec![
        R::value(
            "name",
            |c| Some(&c.name),
            |c, v| {
                if let Some(v) = v {
                    c.name = v
                }
            },
        ),
        R::value("image", |c| c.image.as_ref(), |c, v| c.image = v),
        R::value("working dir", |c| c.working_dir.as_ref(), |c, v| c.working_dir = v),
        R::value("ports", |c| c.ports.as_ref(), |c, v| c.ports = v),
        R::value("env", |c| c.env.as_ref(), |c, v| c.env = v),
        R::value("env from", |c| c.env_from.as_ref(), |c, v| c.env_from = v),
        R::value("resources", |c| c.resources.as_ref(), |c, v| c.resources = v),
        R::value(
            "volume mounts",
            |c| c.volume_mounts.as_ref(),
            |c, v| c.volume_mounts = v,
        ),
    ]
});

fn apply_container(
    cx: &Context<'_>,
    index: usize,
    desired: &Container,
    observed: &mut Container,
) -> bool {
    let prefix = format!("container[{index}] ");
    let cx = Context {
        kind: cx.kind,
        prefix: &prefix,
    };
    apply_rules(&CONTAINER_RULES, &cx, desired, observed)
}

fn apply_rules<K: 'static>(
    rules: &[Rule<K>],
    cx: &Context<'_>,
    desired: &K,
    observed: &mut K,
) -> bool {
    let mut changed = false;
    for rule in rules {
        changed |= rule.apply(cx, desired, observed);
    }
    changed
}

/// Copies every owned field of `desired` into `observed` and reports whether
/// any of them differed.
pub fn merge<K>(ownership: &Ownership<K>, desired: &K, observed: &mut K) -> bool
where
    K: Resource<DynamicType = ()> + 'static,
{
    let kind = K::kind(&());
    let cx = Context {
        kind: &kind,
        prefix: "",
    };
    apply_rules(&ownership.rules, &cx, desired, observed)
}
