//! Consumer lifecycle error types.
//!
//! Every failure surfaced by `libconsumer` is a [`ConsumerError`].  The
//! variants fall into the families the lifecycle manager reacts to:
//! configuration errors (bad connection string), RPC errors carrying a gRPC
//! status, and validation errors raised when the provider breaks the
//! protocol contract.

use thiserror::Error;
use tonic::Code;

use crate::classify::Operation;

/// Unified error type for consumer lifecycle operations.
#[derive(Debug, Error)]
pub enum ConsumerError {
    /// The connection string is not valid base64.
    #[error("connection string is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded connection string is not a JSON object carrying
    /// `onboardingTicket` and `serverAddress`.
    #[error("failed to parse connection details: {0}")]
    Parse(#[source] serde_json::Error),

    /// The channel to the provider could not be established.
    #[error("failed to connect to provider at {address}: {reason}")]
    Connect {
        /// Provider address taken from the connection details.
        address: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The provider answered an RPC with a non-OK status.
    #[error("{operation} failed: {status}")]
    Rpc {
        /// RPC that failed.
        operation: Operation,
        /// Status returned by the provider or the transport.
        status: tonic::Status,
    },

    /// The provider returned a response missing mandatory fields.
    #[error("{0}: response is empty")]
    EmptyResponse(Operation),

    /// The provider granted a capacity other than the one requested.
    #[error("granted capacity {granted} does not match requested capacity {requested}")]
    CapacityMismatch {
        /// Capacity asked for in the spec.
        requested: String,
        /// Capacity confirmed by the provider.
        granted: String,
    },

    /// A capacity string could not be parsed as a quantity.
    #[error("invalid quantity {value:?}: {reason}")]
    InvalidQuantity {
        /// Offending text.
        value: String,
        /// Why parsing failed.
        reason: &'static str,
    },

    /// A resource returned by `GetStorageConfig` carried a payload that is
    /// not a JSON object of strings.
    #[error("failed to parse data of {kind} {name}: {source}")]
    ConfigParse {
        /// Kind of the offending resource.
        kind: String,
        /// Name of the offending resource.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The stable cluster identifier could not be determined.
    #[error("failed to determine cluster id: {0}")]
    ClusterId(String),
}

impl ConsumerError {
    /// Create a [`ConsumerError::Rpc`] for `operation`.
    pub fn rpc(operation: Operation, status: tonic::Status) -> Self {
        Self::Rpc { operation, status }
    }

    /// Create a [`ConsumerError::Connect`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn connect<E: std::fmt::Display>(address: &str, e: E) -> Self {
        Self::Connect {
            address: address.to_owned(),
            reason: e.to_string(),
        }
    }

    /// Create a [`ConsumerError::ClusterId`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn cluster_id<E: std::fmt::Display>(e: E) -> Self {
        Self::ClusterId(e.to_string())
    }

    /// gRPC status code of an RPC failure, if this is one.
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Rpc { status, .. } => Some(status.code()),
            _ => None,
        }
    }

    /// Whether this error is a malformed connection string, which needs an
    /// operator to correct the spec.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConsumerError::CapacityMismatch {
            requested: "10Gi".into(),
            granted: "5Gi".into(),
        };
        assert_eq!(
            err.to_string(),
            "granted capacity 5Gi does not match requested capacity 10Gi"
        );

        let err = ConsumerError::EmptyResponse(Operation::OnboardConsumer);
        assert_eq!(err.to_string(), "OnboardConsumer: response is empty");
    }

    #[test]
    fn rpc_error_exposes_code() {
        let err = ConsumerError::rpc(
            Operation::UpdateCapacity,
            tonic::Status::not_found("no such consumer"),
        );
        assert_eq!(err.code(), Some(Code::NotFound));
        assert!(!err.is_configuration());
        assert_eq!(ConsumerError::cluster_id("boom").code(), None);
    }
}
