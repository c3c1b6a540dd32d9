use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("kube error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("store error: {0}")]
    Store(String),

    #[error("{kind} has no name")]
    UnnamedObject { kind: String },

    #[error("{kind} {name} is namespaced but has no namespace")]
    MissingNamespace { kind: String, name: String },

    #[error("{kind} {name} was created but is not visible after {attempts} attempts")]
    NotVisible {
        kind: String,
        name: String,
        attempts: u32,
    },

    #[error("unsupported kind {kind} in {api_version}")]
    UnsupportedKind { api_version: String, kind: String },

    #[error("yaml error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
