//! Consumer lifecycle manager.
//!
//! [`ConsumerLifecycleManager`] moves a StorageCluster between the two
//! derived states, *unregistered* (no consumer id in the status) and
//! *onboarded*, and keeps an onboarded registration's capacity and
//! configuration in sync with the provider.
//!
//! Each pass performs at most one RPC and reports a [`ReconcileOutcome`].
//! Nothing is retried internally: the caller owns scheduling and decides when
//! to invoke the manager again.  Passes for different StorageClusters may run
//! concurrently; passes for the same StorageCluster must be serialized by the
//! caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::ExternalResourceCache;
use crate::classify::{Classification, Operation, classify};
use crate::config::ConsumerConfig;
use crate::connection::{INVALID_MESSAGE, INVALID_REASON, decode_connection_string};
use crate::error::ConsumerError;
use crate::event::{EventRecorder, EventType};
use crate::provider::{ProviderApi, ProviderConnector};
use crate::quantity::Quantity;
use crate::types::{ConnectionDetails, ExternalResource, StorageCluster};

/// Source of the stable identifier of the local cluster.
#[async_trait]
pub trait ClusterIdSource: Send + Sync {
    async fn cluster_id(&self) -> Result<String, ConsumerError>;
}

/// A cluster id known up front.
#[derive(Debug, Clone)]
pub struct StaticClusterId(pub String);

#[async_trait]
impl ClusterIdSource for StaticClusterId {
    async fn cluster_id(&self) -> Result<String, ConsumerError> {
        Ok(self.0.clone())
    }
}

/// Result of one lifecycle pass.
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// The pass completed; nothing further is required right now.
    Success,
    /// A transient condition; invoke again after the given delay.
    RetryAfter(Duration),
    /// The pass failed.
    Fatal(ConsumerError),
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            Self::RetryAfter(delay) => Some(*delay),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ConsumerError> {
        match self {
            Self::Fatal(e) => Some(e),
            _ => None,
        }
    }
}

/// The transition a pass will attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    None,
    Onboard,
    Offboard,
    UpdateCapacity,
    RefreshConfig,
}

/// Drives the consumer registration of StorageClusters against their
/// provider.
pub struct ConsumerLifecycleManager {
    connector: Arc<dyn ProviderConnector>,
    cluster_id: Arc<dyn ClusterIdSource>,
    recorder: Arc<EventRecorder>,
    cache: Arc<ExternalResourceCache>,
    config: ConsumerConfig,
}

impl ConsumerLifecycleManager {
    pub fn new(
        connector: Arc<dyn ProviderConnector>,
        cluster_id: Arc<dyn ClusterIdSource>,
        recorder: Arc<EventRecorder>,
        cache: Arc<ExternalResourceCache>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            connector,
            cluster_id,
            recorder,
            cache,
            config,
        }
    }

    /// The cache populated by successful config refreshes.
    pub fn cache(&self) -> &Arc<ExternalResourceCache> {
        &self.cache
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Pick the transition for the current state of `cluster`.
    pub fn next_action(cluster: &StorageCluster) -> LifecycleAction {
        let wanted = cluster.is_external_ocs_provider() && !cluster.is_deleting();
        match (wanted, cluster.consumer_id().is_some()) {
            (false, false) => LifecycleAction::None,
            (false, true) => LifecycleAction::Offboard,
            (true, false) => LifecycleAction::Onboard,
            (true, true) if cluster.capacity_needs_update() => LifecycleAction::UpdateCapacity,
            (true, true) => LifecycleAction::RefreshConfig,
        }
    }

    /// Run one lifecycle pass for `cluster`, updating its status in place.
    #[instrument(skip_all, fields(name = %cluster.metadata.name, uid = %cluster.metadata.uid))]
    pub async fn reconcile(&self, cluster: &mut StorageCluster) -> ReconcileOutcome {
        let action = Self::next_action(cluster);
        debug!(?action, "selected lifecycle action");

        let outcome = match action {
            LifecycleAction::None => ReconcileOutcome::Success,
            LifecycleAction::Onboard => self.onboard(cluster).await,
            LifecycleAction::Offboard => self.offboard(cluster).await,
            LifecycleAction::UpdateCapacity => self.update_capacity(cluster).await,
            LifecycleAction::RefreshConfig => self.refresh_config(cluster).await,
        };

        if outcome.is_success() {
            self.recorder.forget(&cluster.metadata.uid);
        }
        outcome
    }

    /// Register `cluster` with its provider.
    ///
    /// Does nothing unless external OCS storage is enabled and the cluster is
    /// not onboarded yet.
    #[instrument(skip_all, fields(name = %cluster.metadata.name))]
    pub async fn onboard(&self, cluster: &mut StorageCluster) -> ReconcileOutcome {
        if !cluster.is_external_ocs_provider() || cluster.consumer_id().is_some() {
            debug!("onboarding not applicable");
            return ReconcileOutcome::Success;
        }
        finish(self.try_onboard(cluster).await)
    }

    /// Remove the registration of `cluster` from its provider.
    #[instrument(skip_all, fields(name = %cluster.metadata.name))]
    pub async fn offboard(&self, cluster: &mut StorageCluster) -> ReconcileOutcome {
        if cluster.consumer_id().is_none() {
            debug!("not onboarded, nothing to offboard");
            return ReconcileOutcome::Success;
        }
        finish(self.try_offboard(cluster).await)
    }

    /// Ask the provider for the requested capacity.
    #[instrument(skip_all, fields(name = %cluster.metadata.name))]
    pub async fn update_capacity(&self, cluster: &mut StorageCluster) -> ReconcileOutcome {
        if cluster.consumer_id().is_none()
            || cluster.spec.external_storage.requested_capacity.is_none()
        {
            debug!("capacity update not applicable");
            return ReconcileOutcome::Success;
        }
        finish(self.try_update_capacity(cluster).await)
    }

    /// Fetch the provider-issued configuration and cache it.
    #[instrument(skip_all, fields(name = %cluster.metadata.name))]
    pub async fn refresh_config(&self, cluster: &StorageCluster) -> ReconcileOutcome {
        if cluster.consumer_id().is_none() {
            debug!("not onboarded, no config to refresh");
            return ReconcileOutcome::Success;
        }
        finish(self.try_refresh_config(cluster).await)
    }

    /// Decode the connection string of `cluster`, reporting an advisory when
    /// it is unusable.
    pub fn connection_details(
        &self,
        cluster: &StorageCluster,
    ) -> Result<ConnectionDetails, ConsumerError> {
        decode_connection_string(&cluster.spec.external_storage.connection_string).inspect_err(
            |e| {
                error!(error = %e, "connection string is invalid");
                self.recorder.report_if_not_present(
                    &cluster.object_ref(),
                    EventType::Warning,
                    INVALID_REASON,
                    INVALID_MESSAGE,
                );
            },
        )
    }

    async fn connect(
        &self,
        cluster: &StorageCluster,
    ) -> Result<(ConnectionDetails, Box<dyn ProviderApi>), ConsumerError> {
        let details = self.connection_details(cluster)?;
        let provider = self.connector.connect(&details.server_address).await?;
        Ok((details, provider))
    }

    async fn try_onboard(
        &self,
        cluster: &mut StorageCluster,
    ) -> Result<ReconcileOutcome, ConsumerError> {
        let cluster_id = self.cluster_id.cluster_id().await?;
        if cluster_id.is_empty() {
            return Err(ConsumerError::cluster_id("cluster id is empty"));
        }
        let (details, provider) = self.connect(cluster).await?;

        let name = self.config.consumer_name(&cluster_id);
        let capacity = cluster.requested_capacity_string();
        let response = match provider
            .onboard_consumer(&details.onboarding_ticket, &name, &capacity)
            .await
        {
            Ok(response) => response,
            Err(status) => return self.rpc_failure(cluster, Operation::OnboardConsumer, status),
        };

        if response.storage_consumer_uuid.is_empty() || response.granted_capacity.is_empty() {
            return Err(ConsumerError::EmptyResponse(Operation::OnboardConsumer));
        }
        let granted = Quantity::parse(&response.granted_capacity)?;

        info!(
            consumer_id = %response.storage_consumer_uuid,
            %granted,
            %name,
            "onboarded consumer"
        );
        let status = &mut cluster.status.external_storage;
        status.consumer_id = response.storage_consumer_uuid;
        status.granted_capacity = Some(granted);
        Ok(ReconcileOutcome::Success)
    }

    async fn try_offboard(
        &self,
        cluster: &mut StorageCluster,
    ) -> Result<ReconcileOutcome, ConsumerError> {
        let (_, provider) = self.connect(cluster).await?;
        let consumer_id = cluster.status.external_storage.consumer_id.clone();

        if let Err(status) = provider.offboard_consumer(&consumer_id).await {
            return self.rpc_failure(cluster, Operation::OffboardConsumer, status);
        }

        info!(%consumer_id, "offboarded consumer");
        let status = &mut cluster.status.external_storage;
        status.consumer_id.clear();
        status.granted_capacity = None;
        self.cache.evict(&cluster.metadata.uid);
        Ok(ReconcileOutcome::Success)
    }

    async fn try_update_capacity(
        &self,
        cluster: &mut StorageCluster,
    ) -> Result<ReconcileOutcome, ConsumerError> {
        let (_, provider) = self.connect(cluster).await?;
        let consumer_id = cluster.status.external_storage.consumer_id.clone();
        let requested = cluster.requested_capacity_string();

        let response = match provider.update_capacity(&consumer_id, &requested).await {
            Ok(response) => response,
            Err(status) => return self.rpc_failure(cluster, Operation::UpdateCapacity, status),
        };

        let granted = Quantity::parse(&response.granted_capacity)?;
        if cluster.spec.external_storage.requested_capacity.as_ref() != Some(&granted) {
            return Err(ConsumerError::CapacityMismatch {
                requested,
                granted: response.granted_capacity,
            });
        }

        info!(%consumer_id, %granted, "updated consumer capacity");
        cluster.status.external_storage.granted_capacity = Some(granted);
        Ok(ReconcileOutcome::Success)
    }

    async fn try_refresh_config(
        &self,
        cluster: &StorageCluster,
    ) -> Result<ReconcileOutcome, ConsumerError> {
        let (_, provider) = self.connect(cluster).await?;
        let consumer_id = &cluster.status.external_storage.consumer_id;

        let response = match provider.get_storage_config(consumer_id).await {
            Ok(response) => response,
            Err(status) => return self.rpc_failure(cluster, Operation::GetStorageConfig, status),
        };

        let resources = response
            .external_resource
            .into_iter()
            .map(|resource| {
                let data: HashMap<String, String> = serde_json::from_slice(&resource.data)
                    .map_err(|source| ConsumerError::ConfigParse {
                        kind: resource.kind.clone(),
                        name: resource.name.clone(),
                        source,
                    })?;
                Ok(ExternalResource {
                    kind: resource.kind,
                    name: resource.name,
                    data,
                })
            })
            .collect::<Result<Vec<_>, ConsumerError>>()?;

        info!(%consumer_id, count = resources.len(), "fetched storage config");
        self.cache.replace(&cluster.metadata.uid, resources);
        Ok(ReconcileOutcome::Success)
    }

    /// Classify a failed RPC, report its advisory, and turn it into either a
    /// retry outcome or an error.
    fn rpc_failure(
        &self,
        cluster: &StorageCluster,
        operation: Operation,
        status: tonic::Status,
    ) -> Result<ReconcileOutcome, ConsumerError> {
        let classification = classify(operation, status.code());

        if let Some(advisory) = classification.advisory() {
            match advisory.event_type {
                EventType::Normal => info!(%operation, reason = advisory.reason, "{}", advisory.message),
                EventType::Warning => error!(
                    %operation,
                    code = ?status.code(),
                    error = %status.message(),
                    reason = advisory.reason,
                    "{}",
                    advisory.message
                ),
            }
            self.recorder.report_if_not_present(
                &cluster.object_ref(),
                advisory.event_type,
                advisory.reason,
                advisory.message,
            );
        } else {
            warn!(%operation, code = ?status.code(), error = %status.message(), "provider call failed");
        }

        match classification {
            Classification::Retry { delay, .. } => Ok(ReconcileOutcome::RetryAfter(delay)),
            Classification::NoAdvisory | Classification::Advisory(_) => {
                Err(ConsumerError::rpc(operation, status))
            }
        }
    }
}

fn finish(result: Result<ReconcileOutcome, ConsumerError>) -> ReconcileOutcome {
    result.unwrap_or_else(|e| {
        error!(error = %e, "consumer lifecycle pass failed");
        ReconcileOutcome::Fatal(e)
    })
}
