use std::fmt::Debug;

use kube::api::PostParams;
use kube::core::{ClusterResourceScope, NamespaceResourceScope};
use kube::runtime::reflector::ObjectRef;
use kube::{Api, Client, Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// The three calls a reconcile pass makes against the cluster.
pub trait ObjectStore<K: Resource> {
    /// `Ok(None)` when the object does not exist.
    fn fetch(&self, key: &ObjectRef<K>) -> impl Future<Output = Result<Option<K>>> + Send;
    fn create(&self, obj: &K) -> impl Future<Output = Result<K>> + Send;
    /// Replaces the stored object. `obj` carries the resource version it was
    /// read at.
    fn update(&self, obj: &K) -> impl Future<Output = Result<K>> + Send;
}

/// Picks the [`Api`] flavour matching a kind's scope.
pub trait ApiScope: Sized {
    const NAMESPACED: bool;

    fn api<K>(client: Client, namespace: Option<&str>) -> Option<Api<K>>
    where
        K: Resource<Scope = Self, DynamicType = ()>;
}

impl ApiScope for NamespaceResourceScope {
    const NAMESPACED: bool = true;

    fn api<K>(client: Client, namespace: Option<&str>) -> Option<Api<K>>
    where
        K: Resource<Scope = Self, DynamicType = ()>,
    {
        namespace.map(|ns| Api::namespaced(client, ns))
    }
}

impl ApiScope for ClusterResourceScope {
    const NAMESPACED: bool = false;

    fn api<K>(client: Client, _namespace: Option<&str>) -> Option<Api<K>>
    where
        K: Resource<Scope = Self, DynamicType = ()>,
    {
        Some(Api::all(client))
    }
}

/// Identity of `obj` as the store sees it.
pub fn object_ref<K>(obj: &K) -> Result<ObjectRef<K>>
where
    K: Resource<DynamicType = ()>,
{
    let Some(name) = obj.meta().name.as_deref() else {
        return Err(Error::UnnamedObject {
            kind: K::kind(&()).into_owned(),
        });
    };
    let key = ObjectRef::new(name);
    Ok(match obj.meta().namespace.as_deref() {
        Some(ns) => key.within(ns),
        None => key,
    })
}

/// Rejects a namespaced kind addressed without a namespace.
fn check_scope<K>(name: &str, namespace: Option<&str>) -> Result<()>
where
    K: Resource<DynamicType = ()>,
    K::Scope: ApiScope,
{
    if <K::Scope as ApiScope>::NAMESPACED && namespace.is_none() {
        return Err(missing_namespace::<K>(name));
    }
    Ok(())
}

fn missing_namespace<K: Resource<DynamicType = ()>>(name: &str) -> Error {
    Error::MissingNamespace {
        kind: K::kind(&()).into_owned(),
        name: name.to_string(),
    }
}

fn scoped_api<K>(client: &Client, name: &str, namespace: Option<&str>) -> Result<Api<K>>
where
    K: Resource<DynamicType = ()>,
    K::Scope: ApiScope,
{
    check_scope::<K>(name, namespace)?;
    <K::Scope as ApiScope>::api(client.clone(), namespace)
        .ok_or_else(|| missing_namespace::<K>(name))
}

impl<K> ObjectStore<K> for Client
where
    K: Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync,
    K::Scope: ApiScope,
{
    async fn fetch(&self, key: &ObjectRef<K>) -> Result<Option<K>> {
        let api = scoped_api::<K>(self, &key.name, key.namespace.as_deref())?;
        Ok(api.get_opt(&key.name).await?)
    }

    async fn create(&self, obj: &K) -> Result<K> {
        let name = obj.name_any();
        let api = scoped_api::<K>(self, &name, obj.namespace().as_deref())?;
        Ok(api.create(&PostParams::default(), obj).await?)
    }

    async fn update(&self, obj: &K) -> Result<K> {
        let name = obj.name_any();
        let api = scoped_api::<K>(self, &name, obj.namespace().as_deref())?;
        Ok(api.replace(&name, &PostParams::default(), obj).await?)
    }
}
