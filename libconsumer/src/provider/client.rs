//! gRPC client used by the consumer cluster to talk to its provider.

use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, instrument};

use super::pb::{
    OcsProviderClient, OffboardConsumerRequest, OnboardConsumerRequest, OnboardConsumerResponse,
    StorageConfigRequest, StorageConfigResponse, UpdateCapacityRequest, UpdateCapacityResponse,
};
use crate::error::ConsumerError;

/// The four RPCs a consumer issues against its provider.
///
/// Every method awaits a single round trip; failures carry the gRPC status
/// returned by the provider or synthesized by the transport.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    /// Register this cluster as a consumer named `name`.
    async fn onboard_consumer(
        &self,
        ticket: &str,
        name: &str,
        capacity: &str,
    ) -> Result<OnboardConsumerResponse, tonic::Status>;

    /// Remove the registration of `consumer_id`.
    async fn offboard_consumer(&self, consumer_id: &str) -> Result<(), tonic::Status>;

    /// Ask for `capacity` to be granted to `consumer_id`.
    async fn update_capacity(
        &self,
        consumer_id: &str,
        capacity: &str,
    ) -> Result<UpdateCapacityResponse, tonic::Status>;

    /// Fetch the configuration resources issued to `consumer_id`.
    async fn get_storage_config(
        &self,
        consumer_id: &str,
    ) -> Result<StorageConfigResponse, tonic::Status>;
}

/// Turns a provider address into a usable [`ProviderApi`].
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    async fn connect(&self, address: &str) -> Result<Box<dyn ProviderApi>, ConsumerError>;
}

/// Client for a single provider endpoint.
///
/// The channel is established eagerly; `connect_timeout` bounds only that
/// handshake, calls in flight are bounded by the transport alone.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    address: String,
    client: OcsProviderClient<Channel>,
}

impl ProviderClient {
    /// Connect to the provider at `address` (`host:port`, or a full URI).
    #[instrument(skip(connect_timeout))]
    pub async fn connect(address: &str, connect_timeout: Duration) -> Result<Self, ConsumerError> {
        let uri = if address.contains("://") {
            address.to_owned()
        } else {
            format!("http://{address}")
        };
        let channel = Endpoint::from_shared(uri)
            .map_err(|e| ConsumerError::connect(address, e))?
            .connect_timeout(connect_timeout)
            .connect()
            .await
            .map_err(|e| ConsumerError::connect(address, e))?;

        debug!(%address, "provider channel established");
        Ok(Self {
            address: address.to_owned(),
            client: OcsProviderClient::new(channel),
        })
    }
}

#[async_trait]
impl ProviderApi for ProviderClient {
    #[instrument(skip(self, ticket), fields(address = %self.address))]
    async fn onboard_consumer(
        &self,
        ticket: &str,
        name: &str,
        capacity: &str,
    ) -> Result<OnboardConsumerResponse, tonic::Status> {
        let request = OnboardConsumerRequest {
            onboarding_ticket: ticket.to_owned(),
            consumer_name: name.to_owned(),
            capacity: capacity.to_owned(),
        };
        let response = self.client.clone().onboard_consumer(request).await?;
        debug!("OnboardConsumer response received");
        Ok(response.into_inner())
    }

    #[instrument(skip(self), fields(address = %self.address))]
    async fn offboard_consumer(&self, consumer_id: &str) -> Result<(), tonic::Status> {
        let request = OffboardConsumerRequest {
            storage_consumer_uuid: consumer_id.to_owned(),
        };
        self.client.clone().offboard_consumer(request).await?;
        debug!("OffboardConsumer response received");
        Ok(())
    }

    #[instrument(skip(self), fields(address = %self.address))]
    async fn update_capacity(
        &self,
        consumer_id: &str,
        capacity: &str,
    ) -> Result<UpdateCapacityResponse, tonic::Status> {
        let request = UpdateCapacityRequest {
            storage_consumer_uuid: consumer_id.to_owned(),
            capacity: capacity.to_owned(),
        };
        let response = self.client.clone().update_capacity(request).await?;
        debug!("UpdateCapacity response received");
        Ok(response.into_inner())
    }

    #[instrument(skip(self), fields(address = %self.address))]
    async fn get_storage_config(
        &self,
        consumer_id: &str,
    ) -> Result<StorageConfigResponse, tonic::Status> {
        let request = StorageConfigRequest {
            storage_consumer_uuid: consumer_id.to_owned(),
        };
        let response = self.client.clone().get_storage_config(request).await?;
        debug!(
            count = response.get_ref().external_resource.len(),
            "GetStorageConfig response received"
        );
        Ok(response.into_inner())
    }
}

/// [`ProviderConnector`] that dials real gRPC channels.
#[derive(Debug, Clone, Copy)]
pub struct GrpcConnector {
    connect_timeout: Duration,
}

impl GrpcConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl ProviderConnector for GrpcConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn ProviderApi>, ConsumerError> {
        let client = ProviderClient::connect(address, self.connect_timeout).await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_address_is_a_connect_error() {
        let err = ProviderClient::connect("bad address with spaces", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsumerError::Connect { .. }));
        assert!(err.to_string().contains("bad address with spaces"));
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        // Bind then drop to obtain a local port with no listener.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let connector = GrpcConnector::new(Duration::from_secs(2));
        let result = connector.connect(&format!("127.0.0.1:{port}")).await;
        assert!(matches!(result, Err(ConsumerError::Connect { .. })));
    }
}
