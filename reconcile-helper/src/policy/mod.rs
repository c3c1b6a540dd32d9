//! Ownership tables for every kind the helpers reconcile.

mod access;
mod builtin;
mod custom;
mod mesh;
mod workloads;

use std::fmt::Debug;

use kube::Resource;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::merge::{Ownership, Rule};

/// A kind with a declared set of owned fields.
pub trait Owned:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn ownership() -> &'static Ownership<Self>;
}

pub(crate) fn labels<K: Resource + 'static>() -> Rule<K> {
    Rule::map(
        "label",
        |o: &K| o.meta().labels.as_ref(),
        |o: &mut K, v| o.meta_mut().labels = v,
    )
}

pub(crate) fn annotations<K: Resource + 'static>() -> Rule<K> {
    Rule::map(
        "annotation",
        |o: &K| o.meta().annotations.as_ref(),
        |o: &mut K, v| o.meta_mut().annotations = v,
    )
}

/// Owns labels, annotations and the whole `spec` of custom resources.
macro_rules! owns_metadata_and_spec {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::policy::Owned for $ty {
            fn ownership() -> &'static $crate::merge::Ownership<Self> {
                static OWNERSHIP: std::sync::LazyLock<$crate::merge::Ownership<$ty>> =
                    std::sync::LazyLock::new(|| {
                        $crate::merge::Ownership::new(vec![
                            $crate::policy::labels(),
                            $crate::policy::annotations(),
                            $crate::merge::Rule::value(
                                "spec",
                                |o: &$ty| Some(&o.spec),
                                |o: &mut $ty, v| {
                                    if let Some(v) = v {
                                        o.spec = v
                                    }
                                },
                            ),
                        ])
                    });
                &OWNERSHIP
            }
        }
    )*};
}

pub(crate) use owns_metadata_and_spec;
