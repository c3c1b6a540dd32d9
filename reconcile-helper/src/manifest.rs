use std::fmt;

use serde::Deserialize;

pub use crate::kinds::Manifest;
use crate::Result;

impl Manifest {
    /// Decodes every document of a YAML stream. Empty documents are skipped.
    pub fn from_yaml(input: &str) -> Result<Vec<Manifest>> {
        let mut manifests = Vec::new();
        for document in serde_yaml::Deserializer::from_str(input) {
            let value = serde_yaml::Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            manifests.push(Manifest::from_value(value)?);
        }
        Ok(manifests)
    }

    /// Places a namespaced object without a namespace into `namespace`.
    /// Cluster-scoped objects are left alone.
    pub fn default_namespace(&mut self, namespace: &str) {
        if self.is_namespaced() && self.meta().namespace.is_none() {
            self.meta_mut().namespace = Some(namespace.to_string());
        }
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meta = self.meta();
        let name = meta.name.as_deref().unwrap_or("<unnamed>");
        match meta.namespace.as_deref() {
            Some(ns) => write!(f, "{} {}/{}", self.kind(), ns, name),
            None => write!(f, "{} {}", self.kind(), name),
        }
    }
}
