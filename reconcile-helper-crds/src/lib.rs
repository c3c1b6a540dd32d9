//! Custom resource declarations for the third-party kinds the reconcile helpers
//! manage.
//!
//! None of these CRDs are owned by this workspace: they are installed by the
//! operators that serve them (Istio, the Zalando Postgres operator, Crossplane,
//! ACK, Kubeflow, HNC). Schemas are therefore not generated. Each spec keeps
//! the fields the helpers reconcile typed, and collects everything else in an
//! `extra` map so a read-modify-replace cycle never drops fields this crate
//! does not model.

pub mod ack;
pub mod crossplane;
pub mod hnc;
pub mod istio;
pub mod kubeflow;
pub mod postgres;

use std::collections::BTreeMap;

/// Fields of a custom resource spec that are not modelled explicitly.
pub type Extra = BTreeMap<String, serde_json::Value>;
