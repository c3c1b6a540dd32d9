//! Helpers for operators that need to "ensure" Kubernetes objects.
//!
//! Each supported kind declares which of its fields are owned. Reconciling a
//! desired object fetches the live one, creates it when missing, and
//! otherwise copies the owned fields over and replaces the object only if one
//! of them changed. Everything else on the live object (cluster IPs, token
//! data, fields set by other controllers) is left as found.

mod error;
pub mod kinds;
pub mod manifest;
pub mod merge;
pub mod policy;
pub mod reconcile;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use manifest::Manifest;
pub use merge::{Ownership, Visibility, merge};
pub use policy::Owned;
pub use reconcile::{Outcome, Plan, ensure, plan};
pub use store::ObjectStore;
