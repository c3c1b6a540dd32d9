use std::borrow::Cow;

use anyhow::Context;
use reconcile_helper::{Manifest, Outcome};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tokio::io::AsyncReadExt;
use tracing::info_span;

use crate::cli::ManifestArgs;

pub(crate) async fn apply(args: ManifestArgs) -> anyhow::Result<()> {
    let manifests = load(&args).await?;
    let client = kube::Client::try_default().await?;

    for manifest in &manifests {
        let span = info_span!("apply", object = %manifest);
        let outcome = manifest
            .ensure(&client, &span)
            .await
            .with_context(|| format!("failed to apply {manifest}"))?;
        let outcome = match outcome {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::Unchanged => "unchanged",
        };
        println!("{manifest} {outcome}");
    }
    Ok(())
}

pub(crate) async fn diff(args: ManifestArgs) -> anyhow::Result<()> {
    let manifests = load(&args).await?;
    let client = kube::Client::try_default().await?;

    let mut rows = Vec::with_capacity(manifests.len());
    for manifest in &manifests {
        let span = info_span!("diff", object = %manifest);
        let plan = manifest
            .plan(&client, &span)
            .await
            .with_context(|| format!("failed to diff {manifest}"))?;
        rows.push(PlanRow {
            object: manifest.to_string(),
            action: plan.action(),
        });
    }

    let table = Table::new(rows).with(Style::modern()).to_string();
    println!("{table}");
    Ok(())
}

async fn load(args: &ManifestArgs) -> anyhow::Result<Vec<Manifest>> {
    let input = if args.file.as_os_str() == "-" {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("failed to read stdin")?;
        input
    } else {
        tokio::fs::read_to_string(&args.file)
            .await
            .with_context(|| format!("failed to read {}", args.file.display()))?
    };

    let mut manifests = Manifest::from_yaml(&input)?;
    if let Some(namespace) = &args.namespace {
        for manifest in &mut manifests {
            manifest.default_namespace(namespace);
        }
    }
    Ok(manifests)
}

struct PlanRow {
    object: String,
    action: &'static str,
}

impl Tabled for PlanRow {
    const LENGTH: usize = 2;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(&self.object), Cow::Borrowed(self.action)]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![Cow::Borrowed("OBJECT"), Cow::Borrowed("ACTION")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_table() {
        let rows = vec![
            PlanRow {
                object: "Namespace team-a".into(),
                action: "create",
            },
            PlanRow {
                object: "Deployment team-a/web".into(),
                action: "unchanged",
            },
        ];
        let table = Table::new(rows).to_string();
        assert!(table.contains("OBJECT"));
        assert!(table.contains("Deployment team-a/web"));
        assert!(table.contains("unchanged"));
    }
}
