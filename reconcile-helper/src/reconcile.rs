use std::time::Duration;

use kube::ResourceExt;
use kube::runtime::reflector::ObjectRef;
use tracing::{Instrument, Span, debug, error, info, trace};

use crate::merge::{Visibility, merge};
use crate::policy::Owned;
use crate::store::{ObjectStore, object_ref};
use crate::{Error, Result};

/// What a reconcile pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
}

/// What a reconcile pass would do.
#[derive(Clone, Debug, PartialEq)]
pub enum Plan<K> {
    Create,
    /// The observed object with the desired fields merged in.
    Update(K),
    Unchanged,
}

impl<K> Plan<K> {
    pub fn map<U>(self, f: impl FnOnce(K) -> U) -> Plan<U> {
        match self {
            Plan::Create => Plan::Create,
            Plan::Update(obj) => Plan::Update(f(obj)),
            Plan::Unchanged => Plan::Unchanged,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Plan::Create => "create",
            Plan::Update(_) => "update",
            Plan::Unchanged => "unchanged",
        }
    }
}

/// Makes sure an object matching `desired` exists.
///
/// A missing object is created as is. An existing one has its owned fields
/// merged from `desired` and is replaced only if one of them differed. At most
/// one write is issued per call.
pub async fn ensure<K, S>(store: &S, desired: &K, span: &Span) -> Result<Outcome>
where
    K: Owned,
    S: ObjectStore<K> + Sync,
{
    async move {
        let key = key_of(desired)?;
        let kind = K::kind(&());

        let Some(mut observed) = fetch(store, &key).await? else {
            info!(name = %desired.name_any(), namespace = ?desired.namespace(), "creating {kind}");
            if let Err(e) = store.create(desired).await {
                error!(%e, "unable to create {kind}");
                return Err(e);
            }
            if let Visibility::Poll { attempts, interval } = K::ownership().visibility {
                wait_until_visible(store, &key, attempts, interval).await?;
                info!("created {kind} {}", key.name);
            }
            return Ok(Outcome::Created);
        };

        if !merge(K::ownership(), desired, &mut observed) {
            debug!("no changes to {kind} {}", key.name);
            return Ok(Outcome::Unchanged);
        }

        info!(name = %observed.name_any(), namespace = ?observed.namespace(), "updating {kind}");
        if let Err(e) = store.update(&observed).await {
            error!(%e, "unable to update {kind}");
            return Err(e);
        }
        Ok(Outcome::Updated)
    }
    .instrument(span.clone())
    .await
}

/// Dry run of [`ensure`]. Reads the object but never writes.
pub async fn plan<K, S>(store: &S, desired: &K, span: &Span) -> Result<Plan<K>>
where
    K: Owned,
    S: ObjectStore<K> + Sync,
{
    async move {
        let key = key_of(desired)?;
        let Some(mut observed) = fetch(store, &key).await? else {
            return Ok(Plan::Create);
        };
        if merge(K::ownership(), desired, &mut observed) {
            Ok(Plan::Update(observed))
        } else {
            Ok(Plan::Unchanged)
        }
    }
    .instrument(span.clone())
    .await
}

fn key_of<K: Owned>(desired: &K) -> Result<ObjectRef<K>> {
    object_ref(desired).inspect_err(|e| {
        error!(%e, "unable to reconcile {}", K::kind(&()));
    })
}

async fn fetch<K, S>(store: &S, key: &ObjectRef<K>) -> Result<Option<K>>
where
    K: Owned,
    S: ObjectStore<K> + Sync,
{
    store.fetch(key).await.inspect_err(|e| {
        error!(%e, "error getting {} {}", K::kind(&()), key.name);
    })
}

async fn wait_until_visible<K, S>(
    store: &S,
    key: &ObjectRef<K>,
    attempts: u32,
    interval: Duration,
) -> Result<()>
where
    K: Owned,
    S: ObjectStore<K> + Sync,
{
    for attempt in 1..=attempts {
        if attempt > 1 {
            tokio::time::sleep(interval).await;
        }
        match store.fetch(key).await {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => trace!(attempt, "{} {} not visible yet", K::kind(&()), key.name),
            Err(e) => debug!(attempt, %e, "error confirming {} {}", K::kind(&()), key.name),
        }
    }

    let e = Error::NotVisible {
        kind: K::kind(&()).into_owned(),
        name: key.name.clone(),
        attempts,
    };
    error!(%e, "{} create completion failed", K::kind(&()));
    Err(e)
}
