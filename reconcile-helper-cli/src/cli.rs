use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about = "Ensure Kubernetes objects from YAML manifests", long_about = None)]
pub struct Cli {
    /// Tracing filter directives
    #[arg(
        long,
        global = true,
        env = "RECONCILE_HELPER_LOG",
        default_value = "reconcile_helper=info"
    )]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand, Debug)]
pub enum Commands {
    /// Create or update every object in the manifest
    Apply(ManifestArgs),

    /// Show what apply would do without writing anything
    Diff(ManifestArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Multi-document YAML file, `-` for stdin
    #[arg(short = 'f', long = "filename")]
    pub file: PathBuf,

    /// Namespace for namespaced objects that do not set one
    #[arg(short, long, env = "RECONCILE_HELPER_NAMESPACE")]
    pub namespace: Option<String>,
}
