//! # libconsumer: storage consumer lifecycle for RK8s
//!
//! `libconsumer` registers a cluster as a *consumer* of storage capacity
//! exposed by a remote *provider* cluster and keeps that registration in
//! sync: onboarding, offboarding, capacity updates, and refreshing the
//! provider-issued configuration.  It follows the RK8s conventions (Tokio
//! async runtime, `tonic` for gRPC, `tracing` for observability, `thiserror`
//! for structured errors).
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`types`] | StorageCluster model, connection details, external resources. |
//! | [`quantity`] | Kubernetes-style capacity quantities. |
//! | [`error`] | [`ConsumerError`] enum covering all failure modes. |
//! | [`connection`] | Connection string decoding and encoding. |
//! | [`provider`] | gRPC client for the provider's consumer API. |
//! | [`classify`] | Mapping of RPC failures to advisories and retries. |
//! | [`event`] | Advisory sinks and the deduplicating recorder. |
//! | [`cache`] | [`ExternalResourceCache`] of fetched configuration. |
//! | [`config`] | [`ConsumerConfig`] and its environment overrides. |
//! | [`manager`] | [`ConsumerLifecycleManager`] state machine. |

pub mod cache;
pub mod classify;
pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod manager;
pub mod provider;
pub mod quantity;
pub mod types;

// Re-export the most commonly used items at crate root for convenience.
pub use cache::ExternalResourceCache;
pub use config::ConsumerConfig;
pub use error::ConsumerError;
pub use event::{EventRecorder, EventSink, EventType, TracingSink};
pub use manager::{
    ClusterIdSource, ConsumerLifecycleManager, LifecycleAction, ReconcileOutcome,
    StaticClusterId,
};
pub use provider::{GrpcConnector, ProviderApi, ProviderClient, ProviderConnector};
pub use quantity::Quantity;
pub use types::*;
