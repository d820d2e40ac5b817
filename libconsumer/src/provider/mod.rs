//! gRPC transport to the provider cluster.
//!
//! [`pb`] carries the wire messages and the raw tonic client;
//! [`client`] wraps it behind the [`ProviderApi`] seam used by the lifecycle
//! manager.

pub mod client;
pub mod pb;

pub use client::{GrpcConnector, ProviderApi, ProviderClient, ProviderConnector};
