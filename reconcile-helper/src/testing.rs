//! In-memory [`ObjectStore`] that records every write.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use kube::runtime::reflector::ObjectRef;

use crate::policy::Owned;
use crate::store::{ObjectStore, object_ref};
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Write<K> {
    Create(K),
    Update(K),
}

pub(crate) struct RecordingStore<K: Owned> {
    objects: Mutex<HashMap<ObjectRef<K>, K>>,
    writes: Mutex<Vec<Write<K>>>,
    fetches: AtomicUsize,
    // fetches that still miss after a create
    hidden: AtomicUsize,
    hide_after_create: usize,
    // fetches that still fail after a create
    failing: AtomicUsize,
    fail_after_create: usize,
    fetch_error: Option<String>,
    write_error: Option<String>,
}

impl<K: Owned> Default for RecordingStore<K> {
    fn default() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            hidden: AtomicUsize::new(0),
            hide_after_create: 0,
            failing: AtomicUsize::new(0),
            fail_after_create: 0,
            fetch_error: None,
            write_error: None,
        }
    }
}

impl<K: Owned> RecordingStore<K> {
    pub(crate) fn with_objects(objects: impl IntoIterator<Item = K>) -> Self {
        let store = Self::default();
        {
            let mut map = store.objects.lock().expect("lock");
            for obj in objects {
                let key = object_ref(&obj).expect("named object");
                map.insert(key, obj);
            }
        }
        store
    }

    pub(crate) fn hidden_after_create(mut self, fetches: usize) -> Self {
        self.hide_after_create = fetches;
        self
    }

    pub(crate) fn failing_fetches_after_create(mut self, fetches: usize) -> Self {
        self.fail_after_create = fetches;
        self
    }

    pub(crate) fn failing_fetch(mut self, msg: &str) -> Self {
        self.fetch_error = Some(msg.into());
        self
    }

    pub(crate) fn failing_writes(mut self, msg: &str) -> Self {
        self.write_error = Some(msg.into());
        self
    }

    pub(crate) fn writes(&self) -> Vec<Write<K>> {
        self.writes.lock().expect("lock").clone()
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn check_write(&self) -> Result<()> {
        match &self.write_error {
            Some(msg) => Err(Error::Store(msg.clone())),
            None => Ok(()),
        }
    }
}

impl<K: Owned> ObjectStore<K> for RecordingStore<K> {
    async fn fetch(&self, key: &ObjectRef<K>) -> Result<Option<K>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.fetch_error {
            return Err(Error::Store(msg.clone()));
        }
        let failing = self.failing.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing.store(failing - 1, Ordering::SeqCst);
            return Err(Error::Store("etcdserver: request timed out".into()));
        }
        let hidden = self.hidden.load(Ordering::SeqCst);
        if hidden > 0 {
            self.hidden.store(hidden - 1, Ordering::SeqCst);
            return Ok(None);
        }
        Ok(self.objects.lock().expect("lock").get(key).cloned())
    }

    async fn create(&self, obj: &K) -> Result<K> {
        self.check_write()?;
        let key = object_ref(obj)?;
        self.objects.lock().expect("lock").insert(key, obj.clone());
        self.writes.lock().expect("lock").push(Write::Create(obj.clone()));
        self.hidden.store(self.hide_after_create, Ordering::SeqCst);
        self.failing.store(self.fail_after_create, Ordering::SeqCst);
        Ok(obj.clone())
    }

    async fn update(&self, obj: &K) -> Result<K> {
        self.check_write()?;
        let key = object_ref(obj)?;
        self.objects.lock().expect("lock").insert(key, obj.clone());
        self.writes.lock().expect("lock").push(Write::Update(obj.clone()));
        Ok(obj.clone())
    }
}
