//! Subcommand implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::info;

use libconsumer::connection::{decode_connection_string, encode_connection_string};
use libconsumer::{
    ConnectionDetails, ConsumerConfig, ConsumerLifecycleManager, EventRecorder,
    ExternalResourceCache, GrpcConnector, ReconcileOutcome, StaticClusterId, StorageCluster,
    TracingSink,
};

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// base64 connection string handed out by the provider admin.
    pub connection_string: String,
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Onboarding ticket.
    #[arg(long)]
    pub ticket: String,
    /// Provider address, `host:port`.
    #[arg(long)]
    pub address: String,
}

#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// StorageCluster manifest (YAML or JSON).
    #[arg(long, short = 'f')]
    pub cluster: PathBuf,
    /// Stable identifier of this cluster, used to name the registration.
    #[arg(long)]
    pub cluster_id: String,
    /// Write the updated manifest back instead of printing it.
    #[arg(long)]
    pub write: bool,
}

pub fn decode(args: &DecodeArgs) -> Result<()> {
    let details = decode_connection_string(args.connection_string.trim())
        .context("connection string is invalid")?;
    println!("serverAddress: {}", details.server_address);
    println!("onboardingTicket: {}", redact(&details.onboarding_ticket));
    Ok(())
}

pub fn encode(args: &EncodeArgs) -> Result<()> {
    let details = ConnectionDetails {
        onboarding_ticket: args.ticket.clone(),
        server_address: args.address.clone(),
    };
    println!("{}", encode_connection_string(&details));
    Ok(())
}

pub async fn reconcile(args: ReconcileArgs) -> Result<()> {
    let mut cluster = load_cluster(&args.cluster)?;
    let config = ConsumerConfig::from_env();

    let manager = ConsumerLifecycleManager::new(
        Arc::new(GrpcConnector::new(config.connect_timeout)),
        Arc::new(StaticClusterId(args.cluster_id)),
        Arc::new(EventRecorder::new(Arc::new(TracingSink))),
        Arc::new(ExternalResourceCache::new()),
        config,
    );

    let action = ConsumerLifecycleManager::next_action(&cluster);
    info!(?action, name = %cluster.metadata.name, "running lifecycle pass");

    match manager.reconcile(&mut cluster).await {
        ReconcileOutcome::Success => info!("pass succeeded"),
        ReconcileOutcome::RetryAfter(delay) => {
            info!(delay_secs = delay.as_secs(), "provider asked to retry later")
        }
        ReconcileOutcome::Fatal(e) if e.is_configuration() => {
            return Err(anyhow::Error::new(e)
                .context("spec.externalStorage.connectionString needs to be corrected"));
        }
        ReconcileOutcome::Fatal(e) => {
            return Err(anyhow::Error::new(e).context("lifecycle pass failed"));
        }
    }

    if args.write {
        save_cluster(&args.cluster, &cluster)?;
        info!(path = %args.cluster.display(), "manifest updated");
    } else {
        print!("{}", serde_yaml::to_string(&cluster)?);
    }

    if let Some(resources) = manager.cache().get(&cluster.metadata.uid) {
        eprintln!("{}", serde_json::to_string_pretty(&*resources)?);
    }
    Ok(())
}

fn load_cluster(path: &Path) -> Result<StorageCluster> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let cluster: StorageCluster = serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    if cluster.metadata.uid.is_empty() {
        bail!("manifest {} has no metadata.uid", path.display());
    }
    Ok(cluster)
}

fn save_cluster(path: &Path, cluster: &StorageCluster) -> Result<()> {
    let raw = serde_yaml::to_string(cluster)?;
    fs::write(path, raw).with_context(|| format!("failed to write manifest {}", path.display()))
}

/// Keep only a short prefix of a secret for display.
fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    if prefix.chars().count() == secret.chars().count() {
        "*".repeat(prefix.chars().count().max(4))
    } else {
        format!("{prefix}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "\
metadata:
  name: ocs-storagecluster
  namespace: openshift-storage
  uid: a9d0f3b2-uid
spec:
  externalStorage:
    enable: true
    storageProviderKind: ocs
    connectionString: e30=
    requestedCapacity: 1Ti
";

    #[test]
    fn redact_hides_tickets() {
        assert_eq!(redact("eyJhbGciOiJSUzI1NiJ9"), "eyJh****");
        assert_eq!(redact("abc"), "****");
        assert_eq!(redact(""), "****");
    }

    #[test]
    fn manifest_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storagecluster.yaml");
        fs::write(&path, MANIFEST).unwrap();

        let mut cluster = load_cluster(&path).unwrap();
        assert!(cluster.is_external_ocs_provider());
        cluster.status.external_storage.consumer_id = "c-9".into();
        save_cluster(&path, &cluster).unwrap();

        let reloaded = load_cluster(&path).unwrap();
        assert_eq!(reloaded.consumer_id(), Some("c-9"));
        assert_eq!(reloaded.requested_capacity_string(), "1Ti");
    }

    #[tokio::test]
    async fn invalid_connection_string_asks_for_correction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storagecluster.yaml");
        fs::write(&path, MANIFEST.replace("e30=", "not-base64!!")).unwrap();

        let err = reconcile(ReconcileArgs {
            cluster: path.clone(),
            cluster_id: "cluster-a".into(),
            write: true,
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("connectionString needs to be corrected"));
        assert_eq!(load_cluster(&path).unwrap().consumer_id(), None);
    }

    #[test]
    fn manifest_without_uid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sc.yaml");
        fs::write(&path, "metadata:\n  name: x\n").unwrap();
        assert!(load_cluster(&path).is_err());
        assert!(load_cluster(&dir.path().join("missing.yaml")).is_err());
    }
}
